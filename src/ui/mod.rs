pub mod card;
pub mod components;
pub mod forms;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(root[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(5), Constraint::Min(4)].as_ref())
        .split(body[1]);

    let p = Paragraph::new(format!(
        "User Management App  {}  users:{}  — Tab: switch panel; ?: help; q: quit",
        app.api_base,
        app.users.len()
    ))
    .block(
        Block::default()
            .title("usermgr-tui")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_users_table(f, body[0], app);
    forms::render_create_form(f, right[0], app);
    forms::render_update_form(f, right[1], app);
    users::render_selected_card(f, right[2], app);

    components::render_status_bar(f, root[2], app);

    if app.show_help {
        components::render_help_modal(f, f.area(), app);
    }
}
