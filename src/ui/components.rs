//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, Focus};
use std::collections::{BTreeMap, BTreeSet};

/// Render the bottom status bar with focus and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let focus = match app.focus {
        Focus::UsersList => "users",
        Focus::CreateForm => "add user",
        Focus::UpdateForm => "update user",
    };
    let uptime = app.started_at.elapsed().as_secs();
    let msg = format!(
        "focus: {focus}  users:{}  rows/page:{}  up:{}s",
        app.users.len(),
        app.rows_per_page,
        uptime
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area`, clamped to its size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal, listing the active keybindings by group.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 60u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(14);
    let rect = centered_rect(width, height, area);

    // Group actions -> keys so rebound keys show up correctly.
    let mut general: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    let mut navigation: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for ((mods, code), action) in app.keymap.all_bindings().into_iter() {
        let key = match code {
            crossterm::event::KeyCode::BackTab => "Shift+Tab".to_string(),
            crossterm::event::KeyCode::Tab
                if mods.contains(crossterm::event::KeyModifiers::SHIFT) =>
            {
                "Shift+Tab".to_string()
            }
            _ => Keymap::format_key(mods, code),
        };

        match action {
            KeyAction::Quit => {
                general.entry("Quit").or_default().insert(key);
            }
            KeyAction::OpenHelp => {
                general.entry("Help").or_default().insert(key);
            }
            KeyAction::DeleteSelection => {
                general.entry("Delete selected user").or_default().insert(key);
            }
            KeyAction::FocusNext => {
                general.entry("Next panel").or_default().insert(key);
            }
            KeyAction::FocusPrev => {
                general.entry("Previous panel").or_default().insert(key);
            }
            KeyAction::MoveUp => {
                navigation.entry("Move up").or_default().insert(key);
            }
            KeyAction::MoveDown => {
                navigation.entry("Move down").or_default().insert(key);
            }
            KeyAction::PageUp => {
                navigation.entry("Page up").or_default().insert(key);
            }
            KeyAction::PageDown => {
                navigation.entry("Page down").or_default().insert(key);
            }
            KeyAction::Ignore => {}
        }
    }

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "General:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for (label, keys) in general.iter() {
        let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "List navigation:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in navigation.iter() {
        let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Forms:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, value) in [
        ("Switch field", "Up / Down"),
        ("Submit", "Enter"),
        ("Back to list", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("Esc / ?", Style::default().add_modifier(Modifier::ITALIC)),
    ]));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
