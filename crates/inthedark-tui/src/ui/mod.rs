//! UI rendering
//!
//! Lays a [`View`] out with ratatui widgets. All functions are pure (no
//! I/O), taking state and drawing into the given frame.

mod input;
mod notices;
mod screen;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{InputState, View};

/// Render the entire UI.
///
/// `notices` are most recent first.
pub fn render(frame: &mut Frame, view: &View, input: &InputState, notices: &[String]) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const NOTICES_HEIGHT: u16 = 5;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(NOTICES_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, notices_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    screen::render(frame, view, *main_area);
    notices::render(frame, notices, *notices_area);
    input::render(frame, input, &view.hint, *input_area);
    status::render(frame, view, *status_area);
}
