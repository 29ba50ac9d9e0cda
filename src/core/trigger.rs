//! Sentinel-vs-viewport intersection check.
//!
//! The sentinel is a zero-height marker placed right after the last grid row.
//! The trigger fires whenever that marker falls inside the viewport grown by
//! `lead_margin` on both edges, so loading starts before the user actually
//! reaches the bottom.  Duplicate fires are harmless; the page loader drops
//! them while a load is running.

/// Lead margin used when none is configured.
pub const DEFAULT_LEAD_MARGIN: u32 = 200;

/// Visible slice of the scrollable content, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: u32,
    pub height: u32,
}

impl Viewport {
    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    lead_margin: u32,
    armed: bool,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_LEAD_MARGIN)
    }
}

impl ScrollTrigger {
    /// A disarmed trigger; call [`arm`](Self::arm) to start observing.
    pub fn new(lead_margin: u32) -> Self {
        Self {
            lead_margin,
            armed: false,
        }
    }

    pub fn lead_margin(&self) -> u32 {
        self.lead_margin
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop observing for good.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Does a sentinel at `sentinel_y` intersect the expanded viewport?
    pub fn intersects(&self, viewport: Viewport, sentinel_y: u32) -> bool {
        let top = viewport.top.saturating_sub(self.lead_margin);
        let bottom = viewport.bottom().saturating_add(self.lead_margin);
        sentinel_y >= top && sentinel_y <= bottom
    }

    /// `true` when armed and the sentinel is within reach.
    pub fn observe(&self, viewport: Viewport, sentinel_y: u32) -> bool {
        self.is_armed() && self.intersects(viewport, sentinel_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(top: u32, height: u32) -> Viewport {
        Viewport { top, height }
    }

    #[test]
    fn new_trigger_is_disarmed() {
        let t = ScrollTrigger::default();
        assert_eq!(t.lead_margin(), 200);
        assert!(!t.observe(vp(0, 100), 50));
    }

    #[test]
    fn fires_inside_lead_margin() {
        let mut t = ScrollTrigger::new(200);
        t.arm();
        // Viewport covers 0..600, sentinel 150 below the edge.
        assert!(t.observe(vp(0, 600), 750));
        assert!(t.observe(vp(0, 600), 800));
        assert!(!t.observe(vp(0, 600), 801));
    }

    #[test]
    fn fires_when_sentinel_is_on_screen() {
        let mut t = ScrollTrigger::new(0);
        t.arm();
        assert!(t.observe(vp(100, 20), 110));
        assert!(t.observe(vp(100, 20), 120));
        assert!(!t.observe(vp(100, 20), 121));
    }

    #[test]
    fn disarm_is_permanent_for_observation() {
        let mut t = ScrollTrigger::new(5);
        t.arm();
        assert!(t.observe(vp(0, 10), 10));
        t.disarm();
        assert!(!t.observe(vp(0, 10), 10));
        assert!(t.intersects(vp(0, 10), 10));
    }
}
