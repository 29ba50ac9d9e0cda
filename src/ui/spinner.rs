//! Loading indicator — a small spinner + label shown while a page is in
//! flight.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

/// "Loading more movies…" with a spinning icon, centred in `area`.
/// Invisible when `visible` is false.
pub struct LoadingIndicator {
    pub visible: bool,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let label = format!("{} Loading more movies…", spinner_frame(self.tick));
        let width = label.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        let line = Line::from(Span::styled(label, Theme::spinner_style()));
        buf.set_line(x, area.y, &line, area.width.min(width));
    }
}
