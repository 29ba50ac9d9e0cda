//! The line under the grid: loading spinner, end-of-results message, or the
//! static pagination fallback.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::reflect::Indicators;

use super::spinner::LoadingIndicator;
use super::theme::Theme;

/// Static pagination shown once automatic loading has given up.
pub struct Pagination<'a> {
    pub first_page: u32,
    pub current_page: u32,
    pub total_pages: u32,
    pub next_key: &'a str,
    pub prev_key: &'a str,
}

impl Pagination<'_> {
    fn label(&self) -> String {
        let mut parts = vec![format!(
            " Auto-loading stopped · pages {}–{} of {} ",
            self.first_page, self.current_page, self.total_pages
        )];
        if self.first_page > 1 {
            parts.push(format!(" {}: previous page ", self.prev_key));
        }
        if self.current_page < self.total_pages {
            parts.push(format!(" {}: next page ", self.next_key));
        }
        parts.join("│")
    }
}

pub struct Footer<'a> {
    pub indicators: Indicators,
    pub tick: u64,
    pub pagination: Option<Pagination<'a>>,
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.indicators.loading {
            LoadingIndicator {
                visible: true,
                tick: self.tick,
            }
            .render(area, buf);
        } else if self.indicators.end_of_results {
            Paragraph::new(Line::from(Span::styled(
                "✓ You've seen all the movies!",
                Theme::end_of_results_style(),
            )))
            .centered()
            .render(area, buf);
        } else if self.indicators.fallback_pagination {
            if let Some(p) = self.pagination {
                Paragraph::new(Line::from(Span::styled(p.label(), Theme::fallback_style())))
                    .centered()
                    .render(area, buf);
            }
        }
    }
}
