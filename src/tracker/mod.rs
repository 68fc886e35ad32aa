//! Section visibility tracking (scroll-spy).
//!
//! Decides which page section is "active" and which sections have been
//! revealed, from batched intersection reports.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  observe()   ┌─────────────────────┐
//! │  SectionTracker  │─────────────▶│  VisibilitySource   │
//! │                  │◀─ Subscription (cancel handle) ────│  (ScrollSurface,    │
//! │  active          │                                    │   browser IO)       │
//! │  revealed flags  │◀──── Batch (mpsc) ─────────────────│                     │
//! └────────▲─────────┘                                    └──────────▲──────────┘
//!          │ read-only                                               │ scroll_into_view
//!   ┌──────┴──────────────────────────────┐                          │
//!   │ nav dots / top nav / mobile menu    │──────── click ───────────┘
//!   └─────────────────────────────────────┘
//! ```
//!
//! A click never touches the tracker: it scrolls the surface, and the
//! resulting intersection report is what eventually updates the active
//! section.

mod geometry;
mod source;
mod state;

pub use geometry::{Bounds, ObserveOptions, RootMargin, Threshold, Viewport};
pub use source::{
    Batch, IntersectionEntry, ScrollBehavior, ScrollSurface, Subscription, VisibilitySource,
};
pub use state::{Section, SectionTracker};

use compact_str::CompactString;
use std::{borrow::Borrow, fmt};

/// Identifier of a page section, e.g. `intro` or `projects`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(CompactString);

impl SectionId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
