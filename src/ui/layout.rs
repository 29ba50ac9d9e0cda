//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: card grid, indicator line, status bar.
pub struct AppLayout {
    pub grid_area: Rect,
    pub footer_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // grid pane (takes all remaining space)
                Constraint::Length(1), // loading / end / fallback line
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            grid_area: chunks[0],
            footer_area: chunks[1],
            status_area: chunks[2],
        }
    }
}
