//! Non-interactive mode: open a listing, keep "scrolling" until the loader
//! settles, and hand back the finished grid.
//!
//! The reader is modelled as always sitting at the bottom of the page, so the
//! sentinel is in view after every append and the trigger fires as soon as
//! the loader is idle again.

use anyhow::{Context, Result};

use crate::core::{
    grid::CardGrid,
    loader::PageLoader,
    paging::{LoadPhase, PagingState},
    query::{build_request, FilterContext},
    reflect::ListingView,
    render::render_item,
    source::ListingSource,
    trigger::{ScrollTrigger, Viewport},
};

/// How the page view starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    /// Fetch this page first and take the counters from the response.
    Fetch(u32),
    /// Start empty from known counters.
    Counters { current_page: u32, total_pages: u32 },
}

/// Outcome of a headless run.
pub struct Listing {
    pub grid: CardGrid,
    pub phase: LoadPhase,
    /// Pages fetched by the scroll trigger (the opening page excluded).
    pub pages_loaded: u32,
}

pub async fn collect<S: ListingSource>(
    source: &S,
    filters: FilterContext,
    opening: Opening,
    trigger: ScrollTrigger,
    max_pages: Option<u32>,
) -> Result<Listing> {
    let mut grid = CardGrid::default();
    let state = match opening {
        Opening::Fetch(page) => {
            let page = page.max(1);
            let first = source
                .fetch(&build_request(&filters, page))
                .await
                .with_context(|| format!("failed to load listing page {page}"))?;
            let counters = PagingState::new(first.page, first.total_pages);
            grid.append(first.into_items().iter().map(render_item).collect());
            counters
        }
        Opening::Counters {
            current_page,
            total_pages,
        } => PagingState::new(current_page, total_pages),
    };

    let mut loader = PageLoader::start(filters, state, trigger, &mut grid);
    let mut pages_loaded = 0;

    while !loader.state().exhausted() {
        if max_pages.is_some_and(|max| pages_loaded >= max) {
            tracing::info!(pages_loaded, "page limit reached");
            break;
        }
        let sentinel = u32::try_from(grid.len()).unwrap_or(u32::MAX);
        let viewport = Viewport {
            top: sentinel,
            height: 0,
        };
        if !loader.sentinel_in_range(viewport, sentinel) {
            break;
        }
        loader.load_next_page(source, &mut grid).await;
        pages_loaded += 1;
    }

    Ok(Listing {
        phase: loader.state().phase(),
        grid,
        pages_loaded,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;

    use reqwest::StatusCode;

    use super::*;
    use crate::core::query::RequestDescriptor;
    use crate::core::render::ListingItem;
    use crate::core::source::{FetchError, ListingPage};

    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<ListingPage, FetchError>>>,
        pages: Mutex<Vec<Option<u32>>>,
    }

    impl ScriptedSource {
        fn with(replies: Vec<Result<ListingPage, FetchError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                pages: Mutex::default(),
            }
        }
    }

    impl ListingSource for ScriptedSource {
        fn fetch(
            &self,
            request: &RequestDescriptor,
        ) -> impl Future<Output = Result<ListingPage, FetchError>> + Send {
            self.pages.lock().unwrap().push(request.page());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(FetchError::Status(StatusCode::NOT_FOUND)));
            std::future::ready(reply)
        }
    }

    fn page(page: u32, total_pages: u32, ids: &[u64]) -> Result<ListingPage, FetchError> {
        Ok(ListingPage {
            movies: Some(
                ids.iter()
                    .map(|&id| ListingItem {
                        id,
                        title: format!("Film {id}"),
                        release_date: Some("2004-01-01".into()),
                        vote_average: Some(6.5),
                        poster_path: None,
                    })
                    .collect(),
            ),
            page,
            total_pages,
        })
    }

    #[tokio::test]
    async fn scrolls_to_the_last_page() {
        let source = ScriptedSource::with(vec![
            page(1, 3, &[1, 2]),
            page(2, 3, &[3]),
            page(3, 3, &[4, 5]),
        ]);
        let listing = collect(
            &source,
            FilterContext::default(),
            Opening::Fetch(1),
            ScrollTrigger::default(),
            None,
        )
        .await
        .expect("listing");

        assert_eq!(listing.phase, LoadPhase::Exhausted);
        assert_eq!(listing.pages_loaded, 2);
        let ids: Vec<u64> = listing.grid.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(listing.grid.indicators().end_of_results);
        assert_eq!(
            *source.pages.lock().unwrap(),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[tokio::test]
    async fn failure_stops_with_fallback() {
        let source = ScriptedSource::with(vec![
            page(2, 5, &[1]),
            Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
        ]);
        let listing = collect(
            &source,
            FilterContext::default(),
            Opening::Fetch(2),
            ScrollTrigger::default(),
            None,
        )
        .await
        .expect("listing");

        assert_eq!(listing.phase, LoadPhase::Failed);
        assert!(listing.grid.indicators().fallback_pagination);
        assert!(listing.grid.markup().contains("pagination-wrapper"));
    }

    #[tokio::test]
    async fn opening_failure_is_an_error() {
        let source = ScriptedSource::with(vec![Err(FetchError::Status(
            StatusCode::BAD_GATEWAY,
        ))]);
        let err = collect(
            &source,
            FilterContext::default(),
            Opening::Fetch(1),
            ScrollTrigger::default(),
            None,
        )
        .await
        .err()
        .expect("error");
        assert!(err.to_string().contains("listing page 1"));
    }

    #[tokio::test]
    async fn counters_on_last_page_fetch_nothing() {
        let source = ScriptedSource::default();
        let listing = collect(
            &source,
            FilterContext::default(),
            Opening::Counters {
                current_page: 4,
                total_pages: 4,
            },
            ScrollTrigger::default(),
            None,
        )
        .await
        .expect("listing");
        assert_eq!(listing.phase, LoadPhase::Exhausted);
        assert!(source.pages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn page_limit_leaves_loader_idle() {
        let source = ScriptedSource::with(vec![page(1, 9, &[1]), page(2, 9, &[2])]);
        let listing = collect(
            &source,
            FilterContext::default(),
            Opening::Fetch(1),
            ScrollTrigger::default(),
            Some(1),
        )
        .await
        .expect("listing");
        assert_eq!(listing.phase, LoadPhase::Idle);
        assert_eq!(listing.pages_loaded, 1);
        assert_eq!(listing.grid.len(), 2);
    }
}
