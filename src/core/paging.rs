//! Paging state and its transition table.
//!
//! ```text
//!   idle ──trigger──▶ loading ──ok, page < total──▶ idle
//!                        │
//!                        ├──ok, page ≥ total──▶ exhausted   (terminal)
//!                        └──error─────────────▶ failed      (terminal)
//! ```
//!
//! Only the page loader mutates a [`PagingState`].

/// Where the loader is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Exhausted,
    Failed,
}

impl LoadPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadPhase::Exhausted | LoadPhase::Failed)
    }
}

/// Current/total page counters plus the load phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingState {
    current_page: u32,
    total_pages: u32,
    phase: LoadPhase,
}

impl PagingState {
    /// Seed from the page view's initial values.  Counters below 1 are
    /// clamped; a view that starts on its last page is exhausted from the
    /// outset.
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        let current_page = current_page.max(1);
        let total_pages = total_pages.max(1);
        let phase = if current_page >= total_pages {
            LoadPhase::Exhausted
        } else {
            LoadPhase::Idle
        };
        Self {
            current_page,
            total_pages,
            phase,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// `true` only while a load is in flight.
    pub fn busy(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// `true` once no further loads will ever start.
    pub fn exhausted(&self) -> bool {
        self.phase.is_terminal()
    }

    /// `idle → loading`.  Returns the page to request, or `None` when a load
    /// is already running or the state is terminal.
    pub fn begin(&mut self) -> Option<u32> {
        if self.phase != LoadPhase::Idle {
            return None;
        }
        self.phase = LoadPhase::Loading;
        Some(self.current_page.saturating_add(1))
    }

    /// `loading → idle | exhausted` using the server's authoritative counters.
    pub fn succeed(&mut self, page: u32, total_pages: u32) -> LoadPhase {
        debug_assert!(self.busy(), "succeed() outside of a load");
        self.current_page = page.max(1);
        self.total_pages = total_pages.max(1);
        self.phase = if self.current_page >= self.total_pages {
            LoadPhase::Exhausted
        } else {
            LoadPhase::Idle
        };
        self.phase
    }

    /// `loading → failed`.
    pub fn fail(&mut self) -> LoadPhase {
        debug_assert!(self.busy(), "fail() outside of a load");
        self.phase = LoadPhase::Failed;
        self.phase
    }
}
