//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use reqwest::Url;

use crate::config::AppConfig;
use crate::core::{
    grid::CardGrid,
    loader::PageLoader,
    paging::PagingState,
    query::FilterContext,
    reflect::ListingView,
    render::{render_item, DisplayFragment},
    source::{FetchError, ListingPage},
    trigger::ScrollTrigger,
};
use crate::ui::grid_widget::GridState;

/// One page view: what a browser tab shows between two navigations.
///
/// The grid only ever grows while the view lives.  Navigating through the
/// fallback pagination replaces the whole view.
pub struct PageView {
    /// Id tagging every fetch issued for this view; results carrying an
    /// older id are dropped.
    pub generation: u64,
    /// Page the view was opened on.
    pub first_page: u32,
    pub grid: CardGrid,
    /// `None` until the opening page has arrived.
    pub loader: Option<PageLoader>,
    /// Why the opening page could not be shown.
    pub open_error: Option<String>,
}

impl PageView {
    fn opening(generation: u64, first_page: u32) -> Self {
        Self {
            generation,
            first_page,
            grid: CardGrid::default(),
            loader: None,
            open_error: None,
        }
    }
}

/// Top-level application state.
pub struct AppState {
    /// The listing page the user asked for; its query string is the filter
    /// snapshot and its origin is the API server.
    pub listing_url: Url,
    pub filters: FilterContext,
    pub view: PageView,
    /// Widget-level state (selection, scroll).
    pub grid_state: GridState,
    /// User-configurable keybindings and loading settings.
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Absolute link of the movie the user opened; printed on exit.
    pub opened_link: Option<Url>,
    /// Monotonic counter driving the spinner animation.
    pub tick: u64,
    /// Set by the handler when the current view should be replaced by a
    /// fresh one opened on this page.
    pub pending_navigation: Option<u32>,
}

impl AppState {
    pub fn new(listing_url: Url, config: AppConfig) -> Self {
        let filters = FilterContext::from_url(&listing_url);
        Self {
            listing_url,
            filters,
            view: PageView::opening(0, 1),
            grid_state: GridState::default(),
            config,
            should_quit: false,
            status_message: None,
            opened_link: None,
            tick: 0,
            pending_navigation: None,
        }
    }

    fn trigger(&self) -> ScrollTrigger {
        ScrollTrigger::new(self.config.lead_margin)
    }

    /// Drop the current view and start an empty one on `page`.  Returns the
    /// new generation; the caller fetches the opening page under it.
    pub fn begin_page_view(&mut self, page: u32) -> u64 {
        let generation = self.view.generation.wrapping_add(1);
        self.view = PageView::opening(generation, page.max(1));
        self.grid_state = GridState::default();
        self.status_message = Some(format!("Opening page {}…", page.max(1)));
        generation
    }

    /// The opening page arrived: seed the grid and the paging counters.
    pub fn open_with_page(&mut self, page: ListingPage) {
        let (current, total) = (page.page, page.total_pages);
        let cards: Vec<DisplayFragment> = page.into_items().iter().map(render_item).collect();
        let mut grid = CardGrid::default();
        grid.append(cards);
        let loader = PageLoader::start(
            self.filters.clone(),
            PagingState::new(current, total),
            self.trigger(),
            &mut grid,
        );
        self.view.grid = grid;
        self.view.loader = Some(loader);
        self.view.open_error = None;
        self.status_message = None;
    }

    /// The opening page could not be fetched.  The view stays empty; the
    /// user can reload or quit.
    pub fn fail_open(&mut self, error: &FetchError) {
        tracing::error!(page = self.view.first_page, error = %error, "could not open listing page");
        self.view.open_error = Some(error.to_string());
        self.status_message = Some(format!(
            "Could not load page {}: {error}",
            self.view.first_page
        ));
    }

    /// Start a view from explicitly supplied counters with an empty grid.
    pub fn open_with_counters(&mut self, current_page: u32, total_pages: u32) {
        let mut grid = CardGrid::default();
        let loader = PageLoader::start(
            self.filters.clone(),
            PagingState::new(current_page, total_pages),
            self.trigger(),
            &mut grid,
        );
        self.view.first_page = current_page.max(1);
        self.view.grid = grid;
        self.view.loader = Some(loader);
        self.view.open_error = None;
        self.status_message = None;
    }

    pub fn selected_card(&self) -> Option<&DisplayFragment> {
        self.view.grid.get(self.grid_state.selected)
    }

    /// Absolute link of a card on the listing server.
    pub fn card_link(&self, card: &DisplayFragment) -> Option<Url> {
        self.listing_url.join(&card.href).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paging::LoadPhase;
    use crate::core::render::ListingItem;

    fn state() -> AppState {
        AppState::new(
            Url::parse("http://localhost:5000/movies?genre=18").expect("url"),
            AppConfig::default(),
        )
    }

    fn listing(page: u32, total_pages: u32) -> ListingPage {
        ListingPage {
            movies: Some(vec![ListingItem {
                id: 603,
                title: "The Matrix".into(),
                release_date: Some("1999-03-31".into()),
                vote_average: Some(8.2),
                poster_path: None,
            }]),
            page,
            total_pages,
        }
    }

    #[test]
    fn opening_page_seeds_grid_and_counters() {
        let mut s = state();
        let generation = s.begin_page_view(2);
        assert_eq!(generation, 1);
        assert!(s.view.loader.is_none());

        s.open_with_page(listing(2, 4));
        let loader = s.view.loader.as_ref().expect("loader");
        assert_eq!(loader.state().current_page(), 2);
        assert_eq!(loader.state().phase(), LoadPhase::Idle);
        assert!(loader.trigger().is_armed());
        assert_eq!(loader.filters().genre.as_deref(), Some("18"));
        assert_eq!(s.view.grid.len(), 1);
    }

    #[test]
    fn opening_on_last_page_shows_end_message() {
        let mut s = state();
        s.begin_page_view(4);
        s.open_with_page(listing(4, 4));
        assert!(s.view.grid.indicators().end_of_results);
        assert!(!s.view.loader.as_ref().expect("loader").trigger().is_armed());
    }

    #[test]
    fn new_view_replaces_grid() {
        let mut s = state();
        s.begin_page_view(1);
        s.open_with_page(listing(1, 4));
        s.grid_state.selected = 0;
        assert_eq!(s.begin_page_view(3), 2);
        assert!(s.view.grid.is_empty());
        assert_eq!(s.view.first_page, 3);
    }

    #[test]
    fn card_link_is_absolute() {
        let mut s = state();
        s.begin_page_view(1);
        s.open_with_page(listing(1, 1));
        let card = s.selected_card().expect("card").clone();
        assert_eq!(
            s.card_link(&card).map(|u| u.to_string()).as_deref(),
            Some("http://localhost:5000/movie/603")
        );
    }
}
