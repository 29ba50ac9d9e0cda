//! Custom Ratatui widget that renders the [`CardGrid`] as rows of movie cards.
//!
//! Scrolling is row-based: the offset is the first visible card row.  The
//! widget records the column count and viewport height it was drawn with so
//! input handling and the scroll trigger work on the same geometry.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::core::{
    grid::CardGrid,
    render::{CardImage, DisplayFragment},
    trigger::Viewport,
};

use super::theme::Theme;

/// Terminal lines per card: border, title, year, rating, border.
pub const CARD_HEIGHT: u16 = 5;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the grid widget (selection, scroll, last geometry).
#[derive(Debug, Default)]
pub struct GridState {
    /// Index of the highlighted card.
    pub selected: usize,
    /// First visible card row.
    pub offset: usize,
    /// Columns at the last render (0 = not rendered yet).
    pub columns: usize,
    /// Height of the grid viewport in lines at the last render.
    pub viewport_lines: u16,
    /// Screen area the cards were drawn into (for mouse hit testing).
    pub inner: Rect,
}

impl GridState {
    fn cols(&self) -> usize {
        self.columns.max(1)
    }

    /// Card rows that fit in the viewport (at least one).
    pub fn page_rows(&self) -> usize {
        usize::from((self.viewport_lines / CARD_HEIGHT).max(1))
    }

    pub fn total_rows(&self, count: usize) -> usize {
        count.div_ceil(self.cols())
    }

    pub fn select_next(&mut self, count: usize) {
        if count > 0 && self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move `rows` card rows down, stopping on the last card.
    pub fn select_down(&mut self, rows: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.selected = (self.selected + rows * self.cols()).min(count - 1);
    }

    pub fn select_up(&mut self, rows: usize) {
        let step = rows * self.cols();
        if self.selected >= step {
            self.selected -= step;
        }
    }

    pub fn select_last(&mut self, count: usize) {
        self.selected = count.saturating_sub(1);
    }

    /// Scroll the view without moving the selection.
    pub fn scroll_by(&mut self, delta: isize, count: usize) {
        let max_offset = self.total_rows(count).saturating_sub(1);
        self.offset = self.offset.saturating_add_signed(delta).min(max_offset);
    }

    /// Ensure the selected card's row is fully visible.
    pub fn clamp_scroll(&mut self) {
        let row = self.selected / self.cols();
        let rows = self.page_rows();
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + rows {
            self.offset = row + 1 - rows;
        }
    }

    /// Visible slice of the grid in content lines, once rendered.
    pub fn viewport(&self) -> Option<Viewport> {
        (self.columns > 0).then(|| Viewport {
            top: line_of_row(self.offset),
            height: u32::from(self.viewport_lines),
        })
    }

    /// Content line of the sentinel: right below the last card row.
    pub fn sentinel_line(&self, count: usize) -> u32 {
        line_of_row(self.total_rows(count))
    }

    /// Card index under a screen position.
    pub fn card_at(&self, col: u16, row: u16, card_width: u16, count: usize) -> Option<usize> {
        let inner = self.inner;
        if col < inner.x || row < inner.y || col >= inner.right() || row >= inner.bottom() {
            return None;
        }
        let c = usize::from((col - inner.x) / card_width.max(1));
        if c >= self.cols() {
            return None;
        }
        let r = self.offset + usize::from((row - inner.y) / CARD_HEIGHT);
        let idx = r * self.cols() + c;
        (idx < count).then_some(idx)
    }
}

fn line_of_row(row: usize) -> u32 {
    u32::try_from(row)
        .unwrap_or(u32::MAX)
        .saturating_mul(u32::from(CARD_HEIGHT))
}

// ───────────────────────────────────────── widget ────────────

pub struct GridWidget<'a> {
    grid: &'a CardGrid,
    card_width: u16,
    block: Option<Block<'a>>,
}

impl<'a> GridWidget<'a> {
    pub fn new(grid: &'a CardGrid, card_width: u16) -> Self {
        Self {
            grid,
            card_width: card_width.max(1),
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for GridWidget<'_> {
    type State = GridState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut GridState) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        state.columns = usize::from((inner.width / self.card_width).max(1));
        state.viewport_lines = inner.height;
        state.inner = inner;

        if self.grid.is_empty() {
            state.selected = 0;
            state.offset = 0;
            return;
        }
        let count = self.grid.len();
        state.selected = state.selected.min(count.saturating_sub(1));
        let max_offset = state.total_rows(count).saturating_sub(1);
        state.offset = state.offset.min(max_offset);

        let cols = state.columns;
        let card_w = self.card_width.min(inner.width);
        let mut y = inner.y;
        let mut row = state.offset;
        while y < inner.bottom() {
            for c in 0..cols {
                let idx = row * cols + c;
                let Some(card) = self.grid.get(idx) else {
                    return;
                };
                let x = inner.x + c as u16 * card_w;
                let h = CARD_HEIGHT.min(inner.bottom() - y);
                render_card(card, idx == state.selected, Rect::new(x, y, card_w, h), buf);
            }
            row += 1;
            y = y.saturating_add(CARD_HEIGHT);
        }
    }
}

fn render_card(card: &DisplayFragment, selected: bool, area: Rect, buf: &mut Buffer) {
    let border = if selected {
        Theme::card_selected_border_style()
    } else {
        Theme::card_border_style()
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);

    let year = if card.year.is_empty() { "—" } else { card.year.as_str() };
    let image = match card.image {
        CardImage::Poster { .. } => Span::styled("▣ poster", Theme::card_meta_style()),
        CardImage::Placeholder => Span::styled("▢ no poster", Theme::placeholder_style()),
    };
    // Titles are untrusted; keep control characters away from the terminal.
    let title: String = card.title.chars().filter(|c| !c.is_control()).collect();
    let lines = vec![
        Line::from(Span::styled(title, Theme::card_title_style())),
        Line::from(Span::styled(year, Theme::card_meta_style())),
        Line::from(vec![
            Span::styled(format!("★ {}", card.rating), Theme::rating_style()),
            Span::raw("  "),
            image,
        ]),
    ];
    Paragraph::new(lines).block(block).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reflect::ListingView;
    use crate::core::render::{render_item, ListingItem};

    fn grid(n: u64) -> CardGrid {
        let mut g = CardGrid::default();
        g.append(
            (1..=n)
                .map(|id| {
                    render_item(&ListingItem {
                        id,
                        title: format!("Film {id}"),
                        release_date: Some("2010-01-01".into()),
                        vote_average: None,
                        poster_path: None,
                    })
                })
                .collect(),
        );
        g
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.y..area.bottom())
            .map(|y| (area.x..area.right()).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn render_records_geometry_and_draws_cards() {
        let g = grid(5);
        let mut state = GridState::default();
        assert!(state.viewport().is_none());

        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        GridWidget::new(&g, 20).render(area, &mut buf, &mut state);

        assert_eq!(state.columns, 2);
        assert_eq!(state.viewport_lines, 10);
        assert_eq!(state.viewport(), Some(Viewport { top: 0, height: 10 }));
        // 5 cards over 2 columns = 3 rows.
        assert_eq!(state.sentinel_line(g.len()), 15);

        let out = text(&buf);
        assert!(out.contains("Film 1"));
        assert!(out.contains("Film 4"));
        assert!(!out.contains("Film 5"));
        assert!(out.contains("★ N/A"));
    }

    #[test]
    fn selection_moves_by_rows_and_scrolls() {
        let mut state = GridState {
            columns: 3,
            viewport_lines: 10,
            ..Default::default()
        };
        state.select_down(1, 10);
        assert_eq!(state.selected, 3);
        state.select_down(5, 10);
        assert_eq!(state.selected, 9);
        state.clamp_scroll();
        // Row 3 visible with two rows per page.
        assert_eq!(state.offset, 2);
        state.select_up(1);
        assert_eq!(state.selected, 6);
        state.select_up(10);
        assert_eq!(state.selected, 6);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut state = GridState {
            columns: 2,
            viewport_lines: 5,
            ..Default::default()
        };
        state.scroll_by(100, 7);
        assert_eq!(state.offset, 3);
        state.scroll_by(-10, 7);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn card_hit_testing() {
        let state = GridState {
            columns: 2,
            viewport_lines: 10,
            offset: 1,
            inner: Rect::new(1, 1, 40, 10),
            ..Default::default()
        };
        assert_eq!(state.card_at(1, 1, 20, 6), Some(2));
        assert_eq!(state.card_at(25, 7, 20, 6), Some(5));
        assert_eq!(state.card_at(25, 7, 20, 5), None);
        assert_eq!(state.card_at(0, 1, 20, 6), None);
    }
}
