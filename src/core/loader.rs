//! The page loader: one fetch cycle at a time.
//!
//! A cycle is split into two events so the caller can run the network request
//! wherever it likes (a spawned task in the TUI, inline in headless mode):
//!
//! 1. [`PageLoader::begin_load`] (trigger fired) claims the busy slot and
//!    hands back the request to issue.
//! 2. [`PageLoader::complete_load`] (response succeeded / failed) renders,
//!    appends, updates the counters and settles the indicators.
//!
//! Anything that arrives while a cycle is open is dropped, not queued.

use super::paging::{LoadPhase, PagingState};
use super::query::{build_request, FilterContext, RequestDescriptor};
use super::reflect::{reflect, ListingView};
use super::render::render_item;
use super::source::{FetchError, ListingPage, ListingSource};
use super::trigger::{ScrollTrigger, Viewport};

#[derive(Debug, Clone)]
pub struct PageLoader {
    filters: FilterContext,
    state: PagingState,
    trigger: ScrollTrigger,
}

impl PageLoader {
    /// Set up a page view.  Arms the trigger unless the view already sits on
    /// the last page, in which case the end-of-results message shows at once.
    pub fn start(
        filters: FilterContext,
        state: PagingState,
        mut trigger: ScrollTrigger,
        view: &mut impl ListingView,
    ) -> Self {
        if state.exhausted() {
            tracing::debug!(
                page = state.current_page(),
                "already on last page; trigger stays disarmed"
            );
        } else {
            trigger.arm();
            tracing::debug!(lead_margin = trigger.lead_margin(), "scroll trigger armed");
        }
        reflect(&state, view);
        Self {
            filters,
            state,
            trigger,
        }
    }

    pub fn state(&self) -> &PagingState {
        &self.state
    }

    #[cfg(test)]
    pub fn filters(&self) -> &FilterContext {
        &self.filters
    }

    #[cfg(test)]
    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    /// Is the sentinel within reach of an armed trigger?
    pub fn sentinel_in_range(&self, viewport: Viewport, sentinel_y: u32) -> bool {
        self.trigger.observe(viewport, sentinel_y)
    }

    /// Feed a sentinel observation.  Returns a request when the trigger fires
    /// and no load is running.
    pub fn observe(
        &mut self,
        viewport: Viewport,
        sentinel_y: u32,
        view: &mut impl ListingView,
    ) -> Option<RequestDescriptor> {
        if !self.sentinel_in_range(viewport, sentinel_y) {
            return None;
        }
        self.begin_load(view)
    }

    /// `idle → loading`.  `None` when busy or terminal.
    pub fn begin_load(&mut self, view: &mut impl ListingView) -> Option<RequestDescriptor> {
        let next_page = self.state.begin()?;
        reflect(&self.state, view);
        tracing::debug!(page = next_page, "loading next page");
        Some(build_request(&self.filters, next_page))
    }

    /// Settle the open cycle with the fetch outcome.
    pub fn complete_load(
        &mut self,
        result: Result<ListingPage, FetchError>,
        view: &mut impl ListingView,
    ) -> LoadPhase {
        if !self.state.busy() {
            tracing::warn!("load completion without an open cycle ignored");
            return self.state.phase();
        }

        match result {
            Ok(page) => {
                let (returned, total) = (page.page, page.total_pages);
                let fragments: Vec<_> = page.into_items().iter().map(render_item).collect();
                tracing::debug!(page = returned, total, items = fragments.len(), "page loaded");
                view.append(fragments);

                if self.state.succeed(returned, total) == LoadPhase::Exhausted {
                    tracing::info!(page = returned, "reached the last page");
                    self.trigger.disarm();
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "infinite scroll fetch failed");
                self.state.fail();
                self.trigger.disarm();
            }
        }

        reflect(&self.state, view);
        self.state.phase()
    }

    /// One complete cycle against `source`.  Returns immediately when a load
    /// is already running or the loader is terminal.
    pub async fn load_next_page<S: ListingSource>(
        &mut self,
        source: &S,
        view: &mut impl ListingView,
    ) -> LoadPhase {
        let Some(request) = self.begin_load(view) else {
            return self.state.phase();
        };
        let result = source.fetch(&request).await;
        self.complete_load(result, view)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;

    use proptest::prelude::*;
    use reqwest::StatusCode;

    use super::*;
    use crate::core::render::{DisplayFragment, ListingItem};

    #[derive(Default)]
    struct RecordingView {
        cards: Vec<DisplayFragment>,
        loading: bool,
        end: bool,
        fallback: bool,
    }

    impl ListingView for RecordingView {
        fn append(&mut self, fragments: Vec<DisplayFragment>) {
            self.cards.extend(fragments);
        }
        fn set_loading(&mut self, visible: bool) {
            self.loading = visible;
        }
        fn set_end_of_results(&mut self, visible: bool) {
            self.end = visible;
        }
        fn set_fallback_pagination(&mut self, visible: bool) {
            self.fallback = visible;
        }
    }

    #[derive(Default)]
    struct FakeSource {
        replies: Mutex<VecDeque<Result<ListingPage, FetchError>>>,
        requests: Mutex<Vec<RequestDescriptor>>,
    }

    impl FakeSource {
        fn reply(self, r: Result<ListingPage, FetchError>) -> Self {
            self.replies.lock().unwrap().push_back(r);
            self
        }

        fn requested_pages(&self) -> Vec<Option<u32>> {
            self.requests.lock().unwrap().iter().map(|r| r.page()).collect()
        }
    }

    impl ListingSource for FakeSource {
        fn fetch(
            &self,
            request: &RequestDescriptor,
        ) -> impl Future<Output = Result<ListingPage, FetchError>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(FetchError::Status(StatusCode::NOT_FOUND)));
            std::future::ready(reply)
        }
    }

    fn item(id: u64) -> ListingItem {
        ListingItem {
            id,
            title: format!("Movie {id}"),
            release_date: None,
            vote_average: None,
            poster_path: None,
        }
    }

    fn page(page: u32, total_pages: u32, ids: &[u64]) -> ListingPage {
        ListingPage {
            movies: Some(ids.iter().copied().map(item).collect()),
            page,
            total_pages,
        }
    }

    fn loader(current: u32, total: u32, view: &mut RecordingView) -> PageLoader {
        PageLoader::start(
            FilterContext::default(),
            PagingState::new(current, total),
            ScrollTrigger::new(10),
            view,
        )
    }

    const VP: Viewport = Viewport { top: 0, height: 20 };

    #[test]
    fn rapid_fires_issue_one_request() {
        let mut view = RecordingView::default();
        let mut l = loader(1, 5, &mut view);

        let first = l.observe(VP, 25, &mut view);
        assert_eq!(first.and_then(|r| r.page()), Some(2));
        assert!(view.loading);
        for _ in 0..10 {
            assert!(l.observe(VP, 25, &mut view).is_none());
            assert!(l.begin_load(&mut view).is_none());
        }

        l.complete_load(Ok(page(2, 5, &[1, 2])), &mut view);
        assert!(!view.loading);
        assert_eq!(l.observe(VP, 25, &mut view).and_then(|r| r.page()), Some(3));
    }

    #[test]
    fn sentinel_range_follows_margin_and_arming() {
        let mut view = RecordingView::default();
        let mut l = loader(1, 3, &mut view);
        assert!(l.sentinel_in_range(VP, 30));
        assert!(!l.sentinel_in_range(VP, 31));

        l.complete_load(Err(FetchError::Status(StatusCode::BAD_GATEWAY)), &mut view);
        assert!(l.sentinel_in_range(VP, 30), "no open cycle, completion ignored");
        l.begin_load(&mut view);
        l.complete_load(Err(FetchError::Status(StatusCode::BAD_GATEWAY)), &mut view);
        assert!(!l.sentinel_in_range(VP, 30));
    }

    #[tokio::test]
    async fn starting_on_last_page_never_requests() {
        let mut view = RecordingView::default();
        let mut l = loader(4, 4, &mut view);
        assert!(!l.trigger().is_armed());
        assert!(view.end);

        let source = FakeSource::default();
        assert_eq!(l.load_next_page(&source, &mut view).await, LoadPhase::Exhausted);
        assert!(l.observe(VP, 0, &mut view).is_none());
        assert!(source.requested_pages().is_empty());
    }

    #[tokio::test]
    async fn mid_listing_page_returns_to_idle() {
        let mut view = RecordingView::default();
        let mut l = loader(2, 5, &mut view);
        let source = FakeSource::default()
            .reply(Ok(page(3, 5, &[31, 32])))
            .reply(Ok(page(4, 5, &[41])));

        assert_eq!(l.load_next_page(&source, &mut view).await, LoadPhase::Idle);
        assert_eq!(l.state().current_page(), 3);
        assert_eq!(l.load_next_page(&source, &mut view).await, LoadPhase::Idle);
        assert_eq!(source.requested_pages(), vec![Some(3), Some(4)]);

        let ids: Vec<u64> = view.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![31, 32, 41]);
        assert!(!view.end && !view.fallback && !view.loading);
    }

    #[tokio::test]
    async fn server_page_number_wins_over_requested() {
        let mut view = RecordingView::default();
        let mut l = loader(2, 5, &mut view);
        let source = FakeSource::default().reply(Ok(page(3, 5, &[])));

        l.load_next_page(&source, &mut view).await;
        assert_eq!(l.state().current_page(), 3);
        assert!(view.cards.is_empty());

        let next = l.begin_load(&mut view).expect("idle again");
        assert_eq!(next.page(), Some(4));
    }

    #[tokio::test]
    async fn last_page_exhausts_and_disarms() {
        let mut view = RecordingView::default();
        let mut l = loader(4, 5, &mut view);
        let source = FakeSource::default().reply(Ok(page(5, 5, &[51])));

        assert_eq!(l.load_next_page(&source, &mut view).await, LoadPhase::Exhausted);
        assert!(view.end);
        assert!(!l.trigger().is_armed());
        assert!(l.observe(VP, 0, &mut view).is_none());
        assert_eq!(l.load_next_page(&source, &mut view).await, LoadPhase::Exhausted);
        assert_eq!(source.requested_pages(), vec![Some(5)]);
    }

    #[tokio::test]
    async fn server_error_fails_and_shows_fallback() {
        let mut view = RecordingView::default();
        let mut l = loader(1, 5, &mut view);
        assert!(!view.fallback);
        let source = FakeSource::default()
            .reply(Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)));

        assert_eq!(l.load_next_page(&source, &mut view).await, LoadPhase::Failed);
        assert!(view.fallback);
        assert!(!view.end);
        assert!(!view.loading);
        assert!(!l.trigger().is_armed());

        assert_eq!(l.load_next_page(&source, &mut view).await, LoadPhase::Failed);
        assert_eq!(source.requested_pages().len(), 1);
        assert!(view.cards.is_empty());
    }

    #[test]
    fn malformed_payload_fails() {
        let mut view = RecordingView::default();
        let mut l = loader(1, 5, &mut view);
        l.begin_load(&mut view);
        let err = serde_json::from_str::<ListingPage>("[]").expect_err("not an object");
        assert_eq!(l.complete_load(Err(err.into()), &mut view), LoadPhase::Failed);
        assert!(view.fallback);
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut view = RecordingView::default();
        let mut l = loader(1, 5, &mut view);
        assert_eq!(l.complete_load(Ok(page(5, 5, &[9])), &mut view), LoadPhase::Idle);
        assert!(view.cards.is_empty());
        assert_eq!(l.state().current_page(), 1);
    }

    #[derive(Debug, Clone)]
    enum Event {
        Fire,
        Succeed,
        Fail,
    }

    proptest! {
        #[test]
        fn never_more_than_one_load_in_flight(
            events in proptest::collection::vec(
                prop_oneof![
                    4 => Just(Event::Fire),
                    2 => Just(Event::Succeed),
                    1 => Just(Event::Fail),
                ],
                0..64,
            ),
        ) {
            let mut view = RecordingView::default();
            let mut l = loader(1, 50, &mut view);
            let mut in_flight: Option<u32> = None;
            let mut last_page = 1;

            for ev in events {
                match ev {
                    Event::Fire => {
                        if let Some(req) = l.observe(VP, 0, &mut view) {
                            prop_assert!(in_flight.is_none());
                            let p = req.page().expect("page param");
                            prop_assert_eq!(p, last_page + 1);
                            in_flight = Some(p);
                        }
                    }
                    Event::Succeed => {
                        if let Some(p) = in_flight.take() {
                            l.complete_load(Ok(page(p, 50, &[u64::from(p)])), &mut view);
                            last_page = p;
                        }
                    }
                    Event::Fail => {
                        if in_flight.take().is_some() {
                            l.complete_load(
                                Err(FetchError::Status(StatusCode::BAD_GATEWAY)),
                                &mut view,
                            );
                        }
                    }
                }
                prop_assert_eq!(view.loading, in_flight.is_some());
                prop_assert_eq!(l.state().busy(), in_flight.is_some());
            }

            // Pages land in strictly increasing order.
            let ids: Vec<u64> = view.cards.iter().map(|c| c.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
