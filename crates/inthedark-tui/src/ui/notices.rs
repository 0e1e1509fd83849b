//! Notifications
//!
//! Recent notifications, newest on top.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the notification list.
pub fn render(frame: &mut Frame, notices: &[String], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Notifications ");

    let visible = area.height.saturating_sub(BORDER_SIZE) as usize;
    let items: Vec<ListItem> = notices
        .iter()
        .take(visible)
        .enumerate()
        .map(|(i, notice)| {
            let style = if i == 0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(Span::styled(notice.as_str(), style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
