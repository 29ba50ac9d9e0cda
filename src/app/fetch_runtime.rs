//! Background listing fetches to keep the UI loop responsive.
//!
//! Every fetch runs in its own task and reports back over a channel.  Results
//! are tagged with the page-view generation they were issued under so a
//! result for a view the user already navigated away from is dropped.

use tokio::sync::mpsc;

use crate::core::{
    query::{build_request, RequestDescriptor},
    source::{FetchError, HttpSource, ListingPage, ListingSource},
};

use super::state::AppState;

pub enum FetchUpdate {
    /// The first page of a page view.
    ViewOpened {
        generation: u64,
        result: Result<ListingPage, FetchError>,
    },
    /// A page requested by the scroll trigger.
    PageLoaded {
        generation: u64,
        result: Result<ListingPage, FetchError>,
    },
}

/// Fetch the opening page of a new page view.
pub fn spawn_view_open(
    tx: mpsc::UnboundedSender<FetchUpdate>,
    source: HttpSource,
    generation: u64,
    request: RequestDescriptor,
) {
    tokio::spawn(async move {
        let result = source.fetch(&request).await;
        let _ = tx.send(FetchUpdate::ViewOpened { generation, result });
    });
}

/// Fetch the next page for the loader.
pub fn spawn_page_load(
    tx: mpsc::UnboundedSender<FetchUpdate>,
    source: HttpSource,
    generation: u64,
    request: RequestDescriptor,
) {
    tokio::spawn(async move {
        let result = source.fetch(&request).await;
        let _ = tx.send(FetchUpdate::PageLoaded { generation, result });
    });
}

/// Replace the current view with one opened on `page` and start fetching it.
pub fn open_page_view(
    state: &mut AppState,
    tx: &mpsc::UnboundedSender<FetchUpdate>,
    source: &HttpSource,
    page: u32,
) {
    let generation = state.begin_page_view(page);
    let request = build_request(&state.filters, state.view.first_page);
    tracing::debug!(generation, page = state.view.first_page, "opening page view");
    spawn_view_open(tx.clone(), source.clone(), generation, request);
}

/// Apply one fetch result.  Stale results are ignored.
pub fn apply_fetch_update(state: &mut AppState, update: FetchUpdate) {
    match update {
        FetchUpdate::ViewOpened { generation, result } => {
            if generation != state.view.generation || state.view.loader.is_some() {
                tracing::debug!(generation, "stale opening page dropped");
                return;
            }
            match result {
                Ok(page) => state.open_with_page(page),
                Err(err) => state.fail_open(&err),
            }
        }
        FetchUpdate::PageLoaded { generation, result } => {
            if generation != state.view.generation {
                tracing::debug!(generation, "stale page dropped");
                return;
            }
            let view = &mut state.view;
            if let Some(loader) = view.loader.as_mut() {
                loader.complete_load(result, &mut view.grid);
            }
        }
    }
}
