//! Status bar
//!
//! Connection status and the local user.

use inthedark_app::LinkStatus;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::View;

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let connection_status = match view.link {
        LinkStatus::Offline => Span::styled("Offline", Style::default().fg(Color::Red)),
        LinkStatus::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        LinkStatus::Online => Span::styled(
            format!("Online as {}", view.user_id),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let status_line = Line::from(vec![Span::raw(" "), connection_status]);
    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
