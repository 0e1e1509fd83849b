//! Screen area
//!
//! The active screen's title and content.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::View;

/// Render the screen area.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let title = Span::styled(
        format!(" {} ", view.title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    let lines: Vec<Line> = view.body.iter().map(|line| Line::raw(line.as_str())).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
