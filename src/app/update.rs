//! The event loop: draw, drain completed API calls, route key input.
//!
//! All state lives on this thread. Network calls run as independent tasks
//! on a background runtime and report back over a channel, so applying
//! their outcomes never blocks drawing or input handling.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::error;

use crate::api::{ApiClient, UserDraft};
use crate::app::keymap::KeyAction;
use crate::app::{ApiEvent, ApiRequest, AppState, Focus};
use crate::ui;

/// What a key press asks the loop to do next.
#[derive(Debug)]
pub enum KeyOutcome {
    Continue,
    Quit,
    Request(ApiRequest),
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    client: ApiClient,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let (tx, mut rx) = mpsc::unbounded_channel::<ApiEvent>();

    let mut app = AppState::new(client.base().as_str().to_string());

    // The list is fetched once per run; there is no refetch or polling.
    dispatch(&runtime, &client, &tx, ApiRequest::LoadUsers);

    loop {
        while let Ok(completed) = rx.try_recv() {
            apply_api_event(&mut app, completed);
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(&mut app, &key) {
                        KeyOutcome::Continue => {}
                        KeyOutcome::Quit => break,
                        KeyOutcome::Request(req) => dispatch(&runtime, &client, &tx, req),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Spawn one network call; its outcome comes back as an [`ApiEvent`].
///
/// Calls are independent: nothing serializes, cancels, or times them out,
/// so completions may arrive in any order and the last-applied patch wins.
pub fn dispatch(
    runtime: &tokio::runtime::Runtime,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiEvent>,
    req: ApiRequest,
) {
    let client = client.clone();
    let tx = tx.clone();
    runtime.spawn(async move {
        let completed = match req {
            ApiRequest::LoadUsers => {
                ApiEvent::Loaded(client.list_users().await.map_err(|e| e.to_string()))
            }
            ApiRequest::CreateUser { draft } => {
                ApiEvent::Created(client.create_user(&draft).await.map_err(|e| e.to_string()))
            }
            ApiRequest::UpdateUser { id, draft } => {
                let result = client
                    .update_user(&id, &draft)
                    .await
                    .map_err(|e| e.to_string());
                ApiEvent::Updated { id, draft, result }
            }
            ApiRequest::DeleteUser { id } => {
                let result = client.delete_user(id).await.map_err(|e| e.to_string());
                ApiEvent::Deleted { id, result }
            }
        };
        // The receiver only goes away when the loop is shutting down.
        let _ = tx.send(completed);
    });
}

/// Fold one completed network call into local state.
///
/// Success patches mirror the request that was sent; the server is never
/// re-queried after a mutation. Failures only log.
pub fn apply_api_event(app: &mut AppState, completed: ApiEvent) {
    match completed {
        ApiEvent::Loaded(Ok(users)) => {
            app.users = users;
            clamp_selection(app);
        }
        ApiEvent::Loaded(Err(err)) => {
            error!("error fetching data: {err}");
        }
        ApiEvent::Created(Ok(user)) => {
            app.users.insert(0, user);
            app.create_form.clear();
        }
        ApiEvent::Created(Err(err)) => {
            // The create form keeps its values so the input is not lost.
            error!("error creating user: {err}");
        }
        ApiEvent::Updated {
            id,
            draft,
            result: Ok(()),
        } => {
            // The list entry mirrors what was sent, not what the server holds.
            if let Ok(id) = id.trim().parse::<i64>()
                && let Some(user) = app.users.iter_mut().find(|u| u.id == id)
            {
                user.name = draft.name;
                user.email = draft.email;
            }
        }
        ApiEvent::Updated {
            result: Err(err), ..
        } => {
            error!("error updating user: {err}");
        }
        ApiEvent::Deleted { id, result: Ok(()) } => {
            app.users.retain(|u| u.id != id);
            clamp_selection(app);
        }
        ApiEvent::Deleted {
            result: Err(err), ..
        } => {
            error!("error deleting user: {err}");
        }
    }
}

fn clamp_selection(app: &mut AppState) {
    if app.users.is_empty() {
        app.selected_index = 0;
    } else if app.selected_index >= app.users.len() {
        app.selected_index = app.users.len() - 1;
    }
}

/// Route one key press according to the focused panel.
pub fn handle_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.show_help = false;
        }
        return KeyOutcome::Continue;
    }

    match app.focus {
        Focus::UsersList => handle_list_key(app, key),
        Focus::CreateForm => handle_create_form_key(app, key),
        Focus::UpdateForm => handle_update_form_key(app, key),
    }
}

fn handle_list_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    let Some(action) = app.keymap.resolve(key) else {
        return KeyOutcome::Continue;
    };
    match action {
        KeyAction::Quit => return KeyOutcome::Quit,
        KeyAction::OpenHelp => app.show_help = true,
        KeyAction::FocusNext => app.focus = app.focus.next(),
        KeyAction::FocusPrev => app.focus = app.focus.prev(),
        KeyAction::MoveUp => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.users.len() {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1);
            if app.selected_index >= rpp {
                app.selected_index -= rpp;
            } else {
                app.selected_index = 0;
            }
        }
        KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.users.len().saturating_sub(1));
        }
        KeyAction::DeleteSelection => {
            // Deletes fire immediately; there is no confirmation step.
            if let Some(user) = app.users.get(app.selected_index) {
                return KeyOutcome::Request(ApiRequest::DeleteUser { id: user.id });
            }
        }
        KeyAction::Ignore => {}
    }
    KeyOutcome::Continue
}

fn handle_create_form_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => app.focus = Focus::UsersList,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Up => app.create_form.prev_field(),
        KeyCode::Down => app.create_form.next_field(),
        KeyCode::Backspace => {
            app.create_form.active_value_mut().pop();
        }
        KeyCode::Enter => {
            // Inputs stay put until the server confirms the create.
            let draft = UserDraft {
                name: app.create_form.name.clone(),
                email: app.create_form.email.clone(),
            };
            return KeyOutcome::Request(ApiRequest::CreateUser { draft });
        }
        KeyCode::Char(c) => app.create_form.active_value_mut().push(c),
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_update_form_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => app.focus = Focus::UsersList,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Up => app.update_form.prev_field(),
        KeyCode::Down => app.update_form.next_field(),
        KeyCode::Backspace => {
            app.update_form.active_value_mut().pop();
        }
        KeyCode::Enter => {
            let id = app.update_form.id.clone();
            let draft = UserDraft {
                name: app.update_form.name.clone(),
                email: app.update_form.email.clone(),
            };
            // Cleared at submission, before the outcome is known; a failed
            // request does not restore the inputs.
            app.update_form.clear();
            return KeyOutcome::Request(ApiRequest::UpdateUser { id, draft });
        }
        KeyCode::Char(c) => app.update_form.active_value_mut().push(c),
        _ => {}
    }
    KeyOutcome::Continue
}
