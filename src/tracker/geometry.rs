//! Viewport geometry for visibility checks.
//!
//! All coordinates are integer document units (pixels in the browser, rows in
//! the terminal preview). Integers keep the threshold boundary exact: a section
//! is intersecting when `visible * 100 >= threshold * height`.
//!
//! ```text
//!  scroll_y ──────────────┐  ← region start (top inset, 0% by default)
//!  │                      │
//!  │   observation region │
//!  │                      │
//!  ├──────────────────────┤  ← region end (bottom inset, 20% by default)
//!  │   excluded band      │
//!  scroll_y + height ─────┘
//! ```

/// Vertical extent of a section in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub top: i64,
    pub height: i64,
}

impl Bounds {
    pub const fn new(top: i64, height: i64) -> Self {
        Self { top, height }
    }

    pub const fn bottom(self) -> i64 {
        self.top + self.height
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_y: i64,
    pub height: i64,
}

impl Viewport {
    pub const fn new(scroll_y: i64, height: i64) -> Self {
        Self { scroll_y, height }
    }
}

/// Minimum share of a section's area that must be inside the region, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold(u8);

impl Threshold {
    /// Values above 100 are clamped.
    pub const fn percent(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Threshold as the `0.0..=1.0` fraction IntersectionObserver expects.
    pub fn as_fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

/// Percentages by which the observation region is shrunk from the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootMargin {
    pub top: u8,
    pub bottom: u8,
}

impl RootMargin {
    /// CSS `rootMargin` string, e.g. `0px 0px -20% 0px`.
    pub fn to_css(self) -> String {
        format!("{} 0px {} 0px", css_inset(self.top), css_inset(self.bottom))
    }
}

fn css_inset(percent: u8) -> String {
    if percent == 0 {
        "0px".into()
    } else {
        format!("-{percent}%")
    }
}

/// Parameters shared by every observed section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveOptions {
    pub threshold: Threshold,
    pub root_margin: RootMargin,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            threshold: Threshold::percent(30),
            root_margin: RootMargin { top: 0, bottom: 20 },
        }
    }
}

impl ObserveOptions {
    /// Observation region `[start, end)` in document coordinates.
    pub fn region(&self, viewport: Viewport) -> (i64, i64) {
        let inset = |percent: u8| viewport.height * i64::from(percent) / 100;
        let start = viewport.scroll_y + inset(self.root_margin.top);
        let end = viewport.scroll_y + viewport.height - inset(self.root_margin.bottom);
        (start, end)
    }

    /// Number of units of `bounds` inside the observation region.
    pub fn visible(&self, bounds: Bounds, viewport: Viewport) -> i64 {
        let (start, end) = self.region(viewport);
        (bounds.bottom().min(end) - bounds.top.max(start)).max(0)
    }

    /// Visible share of the section, `0.0..=1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self, bounds: Bounds, viewport: Viewport) -> f64 {
        if bounds.height <= 0 {
            return 0.0;
        }
        self.visible(bounds, viewport) as f64 / bounds.height as f64
    }

    /// Inclusive threshold check. Zero-height sections never intersect.
    pub fn is_intersecting(&self, bounds: Bounds, viewport: Viewport) -> bool {
        if bounds.height <= 0 {
            return false;
        }
        let visible = self.visible(bounds, viewport);
        visible > 0 && visible * 100 >= i64::from(self.threshold.get()) * bounds.height
    }
}
