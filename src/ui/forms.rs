//! The create and update forms on the right-hand side.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, CreateField, Focus, Theme, UpdateField};

/// One labelled input row; the active field carries the ▶ marker.
pub fn input_line(label: &str, value: &str, active: bool, theme: &Theme) -> Line<'static> {
    let marker = if active { "▶" } else { " " };
    let style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(Span::styled(format!("{marker} {label}: {value}"), style))
}

pub fn render_create_form(f: &mut Frame, area: Rect, app: &AppState) {
    let border = if app.focus == Focus::CreateForm {
        app.theme.border_focus
    } else {
        app.theme.border
    };
    let lines = vec![
        input_line(
            "Name",
            &app.create_form.name,
            app.create_form.field == CreateField::Name,
            &app.theme,
        ),
        input_line(
            "Email",
            &app.create_form.email,
            app.create_form.field == CreateField::Email,
            &app.theme,
        ),
    ];
    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Add User")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

pub fn render_update_form(f: &mut Frame, area: Rect, app: &AppState) {
    let border = if app.focus == Focus::UpdateForm {
        app.theme.border_focus
    } else {
        app.theme.border
    };
    let lines = vec![
        input_line(
            "User ID",
            &app.update_form.id,
            app.update_form.field == UpdateField::Id,
            &app.theme,
        ),
        input_line(
            "New Name",
            &app.update_form.name,
            app.update_form.field == UpdateField::Name,
            &app.theme,
        ),
        input_line(
            "New Email",
            &app.update_form.email,
            app.update_form.field == UpdateField::Email,
            &app.theme,
        ),
    ];
    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Update User")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}
