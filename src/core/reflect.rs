//! Indicator visibility derived from the paging state.

use super::paging::{LoadPhase, PagingState};

/// Visibility of the three status elements around the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indicators {
    pub loading: bool,
    pub end_of_results: bool,
    pub fallback_pagination: bool,
}

impl Indicators {
    pub fn from_state(state: &PagingState) -> Self {
        let phase = state.phase();
        Self {
            loading: state.busy(),
            end_of_results: phase == LoadPhase::Exhausted,
            fallback_pagination: phase == LoadPhase::Failed,
        }
    }
}

/// The surface the loader writes into: the grid plus its indicators.
pub trait ListingView {
    /// Append cards at the end of the grid, in order.
    fn append(&mut self, fragments: Vec<super::render::DisplayFragment>);
    fn set_loading(&mut self, visible: bool);
    fn set_end_of_results(&mut self, visible: bool);
    fn set_fallback_pagination(&mut self, visible: bool);
}

/// Push the indicators for `state` onto `view`.
pub fn reflect(state: &PagingState, view: &mut impl ListingView) -> Indicators {
    let ind = Indicators::from_state(state);
    view.set_loading(ind.loading);
    view.set_end_of_results(ind.end_of_results);
    view.set_fallback_pagination(ind.fallback_pagination);
    ind
}
