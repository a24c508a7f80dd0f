// Unit tests for usermgr-tui
// These tests work with the public API without modifying the main codebase

#[cfg(test)]
mod api_model_tests {
    use usermgr_tui::api::{User, UserDraft};

    #[test]
    fn test_user_decodes_from_server_json() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "name": "A", "email": "a@x.com"}"#).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "A");
        assert_eq!(user.email, "a@x.com");
    }

    #[test]
    fn test_draft_serializes_without_id() {
        let draft = UserDraft {
            name: "B".to_string(),
            email: "b@x.com".to_string(),
        };
        let value = serde_json::to_value(&draft).unwrap();
        // The id travels in the URL path for updates, never in the body
        assert!(value.get("id").is_none());
        assert_eq!(value.get("name").unwrap(), "B");
        assert_eq!(value.get("email").unwrap(), "b@x.com");
    }
}

#[cfg(test)]
mod error_handling_tests {
    use usermgr_tui::error::{Context, SimpleError, simple_error};

    #[test]
    fn test_context_error_chaining() {
        // Test with a concrete error type that implements std::error::Error
        let base_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<(), std::io::Error> = Err(base_error);

        let with_context = result.with_ctx(|| "Failed to read theme config".to_string());

        assert!(with_context.is_err());
        let err = with_context.unwrap_err();
        let err_string = err.to_string();
        assert!(err_string.contains("Failed to read theme config"));
        assert!(err_string.contains("file not found"));
    }

    #[test]
    fn test_nested_contexts() {
        // Test single level of context wrapping
        let base_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let result: Result<(), std::io::Error> = Err(base_error);

        let with_context = result.with_ctx(|| "Cannot write to file".to_string());

        let err = with_context.unwrap_err();
        let err_string = err.to_string();
        assert!(err_string.contains("Cannot write to file"));
        assert!(err_string.contains("access denied"));

        // Check error chain - the source should be the original io::Error
        let source = err.source();
        assert!(source.is_some());
        let inner = source.unwrap().to_string();
        assert!(inner.contains("access denied"));
    }

    #[test]
    fn test_simple_error() {
        let err = simple_error("Custom error message");
        assert_eq!(err.to_string(), "Custom error message");

        let err2 = SimpleError::new("Another error");
        assert_eq!(err2.to_string(), "Another error");
    }
}

#[cfg(test)]
mod app_state_tests {
    use usermgr_tui::app::{CreateField, CreateForm, Focus, Theme, UpdateField, UpdateForm};

    #[test]
    fn test_focus_cycle_forward_and_back() {
        let focus = Focus::UsersList;
        assert_eq!(focus.next(), Focus::CreateForm);
        assert_eq!(focus.next().next(), Focus::UpdateForm);
        assert_eq!(focus.next().next().next(), Focus::UsersList);

        assert_eq!(Focus::UsersList.prev(), Focus::UpdateForm);
        assert_eq!(Focus::CreateForm.prev(), Focus::UsersList);
    }

    #[test]
    fn test_create_form_field_cycle() {
        let mut form = CreateForm::default();
        assert_eq!(form.field, CreateField::Name);
        form.next_field();
        assert_eq!(form.field, CreateField::Email);
        form.next_field();
        assert_eq!(form.field, CreateField::Name);
        // With two fields, prev is the same hop
        form.prev_field();
        assert_eq!(form.field, CreateField::Email);
    }

    #[test]
    fn test_update_form_field_cycle() {
        let mut form = UpdateForm::default();
        assert_eq!(form.field, UpdateField::Id);
        form.next_field();
        assert_eq!(form.field, UpdateField::Name);
        form.next_field();
        assert_eq!(form.field, UpdateField::Email);
        form.next_field();
        assert_eq!(form.field, UpdateField::Id);
        form.prev_field();
        assert_eq!(form.field, UpdateField::Email);
    }

    #[test]
    fn test_active_value_follows_field() {
        let mut form = UpdateForm::default();
        form.active_value_mut().push('1');
        form.next_field();
        form.active_value_mut().push_str("Ann");
        form.next_field();
        form.active_value_mut().push_str("ann@x.com");

        assert_eq!(form.id, "1");
        assert_eq!(form.name, "Ann");
        assert_eq!(form.email, "ann@x.com");
    }

    #[test]
    fn test_form_clear_resets_values_and_cursor() {
        let mut create = CreateForm {
            name: "B".to_string(),
            email: "b@x.com".to_string(),
            field: CreateField::Email,
        };
        create.clear();
        assert!(create.name.is_empty());
        assert!(create.email.is_empty());
        assert_eq!(create.field, CreateField::Name);

        let mut update = UpdateForm {
            id: "1".to_string(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            field: UpdateField::Email,
        };
        update.clear();
        assert!(update.id.is_empty());
        assert!(update.name.is_empty());
        assert!(update.email.is_empty());
        assert_eq!(update.field, UpdateField::Id);
    }

    #[test]
    fn test_theme_creation() {
        let theme = Theme::dark();
        // Just verify it can be created
        assert_eq!(theme.text, ratatui::style::Color::Gray);
    }
}

#[cfg(test)]
mod keymap_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use usermgr_tui::app::keymap::{KeyAction, Keymap};

    #[test]
    fn test_default_bindings_resolve() {
        let km = Keymap::default();
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(km.resolve(&press(KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(
            km.resolve(&press(KeyCode::Char('?'))),
            Some(KeyAction::OpenHelp)
        );
        assert_eq!(km.resolve(&press(KeyCode::Tab)), Some(KeyAction::FocusNext));
        assert_eq!(
            km.resolve(&press(KeyCode::Delete)),
            Some(KeyAction::DeleteSelection)
        );
        assert_eq!(km.resolve(&press(KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&press(KeyCode::Char('k'))), Some(KeyAction::MoveUp));
        assert_eq!(km.resolve(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_backtab_variants_resolve_focus_prev() {
        let km = Keymap::default();
        // Terminals disagree on how Shift+Tab arrives
        let variants = [
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT),
        ];
        for key in variants {
            assert_eq!(km.resolve(&key), Some(KeyAction::FocusPrev));
        }
    }

    #[test]
    fn test_format_key_specs() {
        assert_eq!(
            Keymap::format_key(KeyModifiers::NONE, KeyCode::Char('?')),
            "?"
        );
        assert_eq!(
            Keymap::format_key(KeyModifiers::CONTROL, KeyCode::Char('q')),
            "Ctrl+q"
        );
        assert_eq!(
            Keymap::format_key(KeyModifiers::NONE, KeyCode::BackTab),
            "BackTab"
        );
    }
}

#[cfg(test)]
mod key_handling_tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use usermgr_tui::api::User;
    use usermgr_tui::app::keymap::Keymap;
    use usermgr_tui::app::update::{KeyOutcome, handle_key};
    use usermgr_tui::app::{ApiRequest, AppState, CreateForm, Focus, Theme, UpdateForm};

    fn test_app(users: Vec<User>) -> AppState {
        AppState {
            started_at: std::time::Instant::now(),
            api_base: "http://localhost:4000/".to_string(),
            users,
            selected_index: 0,
            rows_per_page: 10,
            focus: Focus::UsersList,
            create_form: CreateForm::default(),
            update_form: UpdateForm::default(),
            show_help: false,
            theme: Theme::mocha(),
            keymap: Keymap::default(),
        }
    }

    fn user(id: i64, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_from_list() {
        let mut app = test_app(vec![]);
        assert!(matches!(
            handle_key(&mut app, &press(KeyCode::Char('q'))),
            KeyOutcome::Quit
        ));
    }

    #[test]
    fn test_tab_cycles_panels() {
        let mut app = test_app(vec![]);
        handle_key(&mut app, &press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::CreateForm);
        handle_key(&mut app, &press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::UpdateForm);
        handle_key(&mut app, &press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::UsersList);
        handle_key(&mut app, &press(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::UpdateForm);
    }

    #[test]
    fn test_esc_returns_from_form_to_list() {
        let mut app = test_app(vec![]);
        app.focus = Focus::CreateForm;
        handle_key(&mut app, &press(KeyCode::Esc));
        assert_eq!(app.focus, Focus::UsersList);

        app.focus = Focus::UpdateForm;
        handle_key(&mut app, &press(KeyCode::Esc));
        assert_eq!(app.focus, Focus::UsersList);
    }

    #[test]
    fn test_list_navigation_clamps_at_edges() {
        let mut app = test_app(vec![
            user(1, "A", "a@x.com"),
            user(2, "B", "b@x.com"),
            user(3, "C", "c@x.com"),
        ]);

        // Up at the top stays put
        handle_key(&mut app, &press(KeyCode::Up));
        assert_eq!(app.selected_index, 0);

        handle_key(&mut app, &press(KeyCode::Down));
        handle_key(&mut app, &press(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 2);

        // Down at the bottom stays put
        handle_key(&mut app, &press(KeyCode::Down));
        assert_eq!(app.selected_index, 2);

        // Paging clamps to the ends
        handle_key(&mut app, &press(KeyCode::PageDown));
        assert_eq!(app.selected_index, 2);
        handle_key(&mut app, &press(KeyCode::PageUp));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_typing_edits_active_create_field() {
        let mut app = test_app(vec![]);
        app.focus = Focus::CreateForm;

        for c in "Bea".chars() {
            handle_key(&mut app, &press(KeyCode::Char(c)));
        }
        handle_key(&mut app, &press(KeyCode::Backspace));
        handle_key(&mut app, &press(KeyCode::Down));
        for c in "b@x.com".chars() {
            handle_key(&mut app, &press(KeyCode::Char(c)));
        }

        assert_eq!(app.create_form.name, "Be");
        assert_eq!(app.create_form.email, "b@x.com");
    }

    #[test]
    fn test_create_submit_keeps_inputs_until_success() {
        let mut app = test_app(vec![]);
        app.focus = Focus::CreateForm;
        app.create_form.name = "B".to_string();
        app.create_form.email = "b@x.com".to_string();

        let outcome = handle_key(&mut app, &press(KeyCode::Enter));
        match outcome {
            KeyOutcome::Request(ApiRequest::CreateUser { draft }) => {
                assert_eq!(draft.name, "B");
                assert_eq!(draft.email, "b@x.com");
            }
            other => panic!("expected create request, got {:?}", other),
        }

        // Inputs survive the submit; only a confirmed create clears them
        assert_eq!(app.create_form.name, "B");
        assert_eq!(app.create_form.email, "b@x.com");
    }

    #[test]
    fn test_update_submit_clears_inputs_immediately() {
        let mut app = test_app(vec![]);
        app.focus = Focus::UpdateForm;
        app.update_form.id = "1".to_string();
        app.update_form.name = "A2".to_string();
        app.update_form.email = "a2@x.com".to_string();

        let outcome = handle_key(&mut app, &press(KeyCode::Enter));
        match outcome {
            KeyOutcome::Request(ApiRequest::UpdateUser { id, draft }) => {
                assert_eq!(id, "1");
                assert_eq!(draft.name, "A2");
                assert_eq!(draft.email, "a2@x.com");
            }
            other => panic!("expected update request, got {:?}", other),
        }

        // Cleared before the outcome is known, unlike the create form
        assert!(app.update_form.id.is_empty());
        assert!(app.update_form.name.is_empty());
        assert!(app.update_form.email.is_empty());
    }

    #[test]
    fn test_delete_key_targets_selected_user() {
        let mut app = test_app(vec![user(1, "A", "a@x.com"), user(2, "B", "b@x.com")]);
        app.selected_index = 1;

        let outcome = handle_key(&mut app, &press(KeyCode::Delete));
        match outcome {
            KeyOutcome::Request(ApiRequest::DeleteUser { id }) => assert_eq!(id, 2),
            other => panic!("expected delete request, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_key_on_empty_list_is_noop() {
        let mut app = test_app(vec![]);
        assert!(matches!(
            handle_key(&mut app, &press(KeyCode::Delete)),
            KeyOutcome::Continue
        ));
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);
        handle_key(&mut app, &press(KeyCode::Char('?')));
        assert!(app.show_help);

        // While help is open, list keys do nothing
        assert!(matches!(
            handle_key(&mut app, &press(KeyCode::Delete)),
            KeyOutcome::Continue
        ));
        assert!(matches!(
            handle_key(&mut app, &press(KeyCode::Down)),
            KeyOutcome::Continue
        ));
        assert_eq!(app.selected_index, 0);
        assert!(app.show_help);

        handle_key(&mut app, &press(KeyCode::Esc));
        assert!(!app.show_help);
    }
}

#[cfg(test)]
mod api_event_tests {
    use usermgr_tui::api::{User, UserDraft};
    use usermgr_tui::app::keymap::Keymap;
    use usermgr_tui::app::update::apply_api_event;
    use usermgr_tui::app::{ApiEvent, AppState, CreateForm, Focus, Theme, UpdateForm};

    fn test_app(users: Vec<User>) -> AppState {
        AppState {
            started_at: std::time::Instant::now(),
            api_base: "http://localhost:4000/".to_string(),
            users,
            selected_index: 0,
            rows_per_page: 10,
            focus: Focus::UsersList,
            create_form: CreateForm::default(),
            update_form: UpdateForm::default(),
            show_help: false,
            theme: Theme::mocha(),
            keymap: Keymap::default(),
        }
    }

    fn user(id: i64, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn draft(name: &str, email: &str) -> UserDraft {
        UserDraft {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_loaded_replaces_list_and_clamps_selection() {
        let mut app = test_app(vec![
            user(1, "A", "a@x.com"),
            user(2, "B", "b@x.com"),
            user(3, "C", "c@x.com"),
        ]);
        app.selected_index = 2;

        apply_api_event(&mut app, ApiEvent::Loaded(Ok(vec![user(9, "Z", "z@x.com")])));

        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users[0].id, 9);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_load_failure_leaves_list_alone() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);

        apply_api_event(&mut app, ApiEvent::Loaded(Err("connection refused".into())));

        assert_eq!(app.users.len(), 1);
        assert_eq!(app.users[0].id, 1);
    }

    #[test]
    fn test_created_prepends_and_clears_form() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);
        app.create_form.name = "B".to_string();
        app.create_form.email = "b@x.com".to_string();

        apply_api_event(&mut app, ApiEvent::Created(Ok(user(2, "B", "b@x.com"))));

        // The server's copy lands first in the list
        assert_eq!(app.users.len(), 2);
        assert_eq!(app.users[0].id, 2);
        assert_eq!(app.users[1].id, 1);
        assert!(app.create_form.name.is_empty());
        assert!(app.create_form.email.is_empty());
    }

    #[test]
    fn test_create_failure_keeps_list_and_form() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);
        app.create_form.name = "B".to_string();
        app.create_form.email = "b@x.com".to_string();

        apply_api_event(&mut app, ApiEvent::Created(Err("500 Internal Server Error".into())));

        assert_eq!(app.users.len(), 1);
        assert_eq!(app.create_form.name, "B");
        assert_eq!(app.create_form.email, "b@x.com");
    }

    #[test]
    fn test_updated_patches_matching_entry_only() {
        let mut app = test_app(vec![user(1, "A", "a@x.com"), user(2, "B", "b@x.com")]);

        apply_api_event(
            &mut app,
            ApiEvent::Updated {
                id: "1".to_string(),
                draft: draft("A2", "a2@x.com"),
                result: Ok(()),
            },
        );

        assert_eq!(app.users[0].name, "A2");
        assert_eq!(app.users[0].email, "a2@x.com");
        // The id itself never changes, and other entries stay untouched
        assert_eq!(app.users[0].id, 1);
        assert_eq!(app.users[1].name, "B");
        assert_eq!(app.users[1].email, "b@x.com");
    }

    #[test]
    fn test_updated_with_unparseable_id_changes_nothing() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);

        apply_api_event(
            &mut app,
            ApiEvent::Updated {
                id: "one".to_string(),
                draft: draft("A2", "a2@x.com"),
                result: Ok(()),
            },
        );

        assert_eq!(app.users[0].name, "A");
    }

    #[test]
    fn test_updated_with_unknown_id_changes_nothing() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);

        apply_api_event(
            &mut app,
            ApiEvent::Updated {
                id: "42".to_string(),
                draft: draft("A2", "a2@x.com"),
                result: Ok(()),
            },
        );

        assert_eq!(app.users[0].name, "A");
    }

    #[test]
    fn test_update_failure_leaves_list_unchanged() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);

        apply_api_event(
            &mut app,
            ApiEvent::Updated {
                id: "1".to_string(),
                draft: draft("A2", "a2@x.com"),
                result: Err("timeout".into()),
            },
        );

        assert_eq!(app.users[0].name, "A");
        assert_eq!(app.users[0].email, "a@x.com");
    }

    #[test]
    fn test_deleted_removes_entry_and_clamps_selection() {
        let mut app = test_app(vec![
            user(1, "A", "a@x.com"),
            user(2, "B", "b@x.com"),
            user(3, "C", "c@x.com"),
        ]);
        app.selected_index = 2;

        apply_api_event(
            &mut app,
            ApiEvent::Deleted {
                id: 3,
                result: Ok(()),
            },
        );

        assert_eq!(app.users.len(), 2);
        assert!(app.users.iter().all(|u| u.id != 3));
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_delete_failure_keeps_entry() {
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);

        apply_api_event(
            &mut app,
            ApiEvent::Deleted {
                id: 1,
                result: Err("403 Forbidden".into()),
            },
        );

        assert_eq!(app.users.len(), 1);
    }

    #[test]
    fn test_racing_updates_last_applied_wins() {
        // Nothing serializes concurrent calls; completions apply in arrival order
        let mut app = test_app(vec![user(1, "A", "a@x.com")]);

        apply_api_event(
            &mut app,
            ApiEvent::Updated {
                id: "1".to_string(),
                draft: draft("first", "f@x.com"),
                result: Ok(()),
            },
        );
        apply_api_event(
            &mut app,
            ApiEvent::Updated {
                id: "1".to_string(),
                draft: draft("second", "s@x.com"),
                result: Ok(()),
            },
        );

        assert_eq!(app.users[0].name, "second");
        assert_eq!(app.users[0].email, "s@x.com");
    }
}

#[cfg(test)]
mod card_tests {
    use ratatui::text::Line;
    use usermgr_tui::api::User;
    use usermgr_tui::app::Theme;
    use usermgr_tui::ui::card::card_lines;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_card_shows_id_name_email() {
        let user = User {
            id: 5,
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
        };
        let lines = card_lines(&user, &Theme::mocha());

        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[0]), "ID: 5");
        assert_eq!(line_text(&lines[1]), "Jane");
        assert_eq!(line_text(&lines[2]), "jane@x.com");
    }
}
