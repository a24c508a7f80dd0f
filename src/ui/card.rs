//! The per-user display card.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::api::User;
use crate::app::Theme;

/// Build the three display lines for one user: id, name, email.
pub fn card_lines(user: &User, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!("ID: {}", user.id),
            Style::default().fg(theme.muted),
        )),
        Line::from(Span::styled(
            user.name.clone(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            user.email.clone(),
            Style::default().fg(theme.text),
        )),
    ]
}
