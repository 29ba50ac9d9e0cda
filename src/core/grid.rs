//! Append-only card grid plus its status indicators.
//!
//! This is the in-memory model the loader writes into.  The terminal widget
//! and the HTML export both read from it.

use super::reflect::{Indicators, ListingView};
use super::render::DisplayFragment;

#[derive(Debug, Default)]
pub struct CardGrid {
    cards: Vec<DisplayFragment>,
    indicators: Indicators,
}

impl CardGrid {
    pub fn cards(&self) -> &[DisplayFragment] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DisplayFragment> {
        self.cards.get(index)
    }

    pub fn indicators(&self) -> Indicators {
        self.indicators
    }

    /// The grid and the elements that follow it, as HTML.
    pub fn markup(&self) -> String {
        let hidden = |visible: bool| if visible { "" } else { " d-none" };
        let mut out = String::from("<div id=\"movie-grid\" class=\"row\">\n");
        for card in self.cards() {
            out.push_str(&card.markup);
            out.push('\n');
        }
        out.push_str("</div>\n");
        out.push_str("<div id=\"scroll-sentinel\" style=\"height:1px\"></div>\n");
        out.push_str(&format!(
            "<div id=\"scroll-spinner\" class=\"d-flex justify-content-center py-4{}\">Loading more movies&hellip;</div>\n",
            hidden(self.indicators.loading)
        ));
        out.push_str(&format!(
            "<div id=\"scroll-end\" class=\"text-center py-4 text-muted{}\">You&#039;ve seen all the movies!</div>\n",
            hidden(self.indicators.end_of_results)
        ));
        if self.indicators.fallback_pagination {
            out.push_str("<nav class=\"pagination-wrapper\"></nav>\n");
        }
        out
    }
}

impl ListingView for CardGrid {
    fn append(&mut self, fragments: Vec<DisplayFragment>) {
        self.cards.extend(fragments);
    }

    fn set_loading(&mut self, visible: bool) {
        self.indicators.loading = visible;
    }

    fn set_end_of_results(&mut self, visible: bool) {
        self.indicators.end_of_results = visible;
    }

    fn set_fallback_pagination(&mut self, visible: bool) {
        self.indicators.fallback_pagination = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{render_item, ListingItem};

    fn card(id: u64, title: &str) -> DisplayFragment {
        render_item(&ListingItem {
            id,
            title: title.into(),
            release_date: None,
            vote_average: Some(6.0),
            poster_path: None,
        })
    }

    #[test]
    fn appends_keep_order_and_duplicates() {
        let mut grid = CardGrid::default();
        grid.append(vec![card(1, "A"), card(2, "B")]);
        grid.append(vec![card(2, "B"), card(3, "C")]);
        let ids: Vec<u64> = grid.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 2, 3]);
    }

    #[test]
    fn markup_reflects_indicators() {
        let mut grid = CardGrid::default();
        grid.append(vec![card(1, "Tom & Jerry")]);
        let html = grid.markup();
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("scroll-end\" class=\"text-center py-4 text-muted d-none\""));
        assert!(!html.contains("pagination-wrapper"));

        grid.set_end_of_results(true);
        assert!(grid.markup().contains("text-muted\">You&#039;ve seen all"));

        grid.set_fallback_pagination(true);
        assert!(grid.markup().contains("pagination-wrapper"));
    }
}
