//! Visibility sources and the in-process scroll surface.
//!
//! A [`VisibilitySource`] accepts a set of sections to observe and delivers
//! batches of [`IntersectionEntry`] over a channel until the returned
//! [`Subscription`] is cancelled. This is the engine-neutral form of the
//! browser's `IntersectionObserver`: registration returns a handle, updates
//! arrive asynchronously and batched.
//!
//! [`ScrollSurface`] is the in-process implementation used by the terminal
//! preview and by tests. It owns the document layout and the viewport,
//! recomputes intersections after every scroll/resize/layout change, and
//! reports only the sections whose intersecting state changed (plus one
//! initial report per section on registration).

use super::{
    SectionId,
    geometry::{Bounds, ObserveOptions, Viewport},
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};

/// Frames used by a smooth scroll.
const SMOOTH_SCROLL_FRAMES: u32 = 12;

// ============================================================================
// Entries & Subscriptions
// ============================================================================

/// One section's visibility as reported by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub id: SectionId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(id: impl Into<SectionId>, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            id: id.into(),
            is_intersecting,
            ratio,
        }
    }
}

/// Entries delivered together. Usually one or two sections cross at once.
pub type Batch = SmallVec<[IntersectionEntry; 4]>;

/// Cancellation handle returned by [`VisibilitySource::observe`].
///
/// Cancelling (or dropping) stops future deliveries. Batches already sent
/// remain in the channel.
#[derive(Debug)]
pub struct Subscription {
    active: Arc<AtomicBool>,
}

impl Subscription {
    fn new() -> (Self, Arc<AtomicBool>) {
        let active = Arc::new(AtomicBool::new(true));
        (
            Self {
                active: Arc::clone(&active),
            },
            active,
        )
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Something that can report section visibility.
pub trait VisibilitySource {
    /// Start observing `targets`. Batches go to `sink` until the handle is cancelled.
    fn observe(
        &mut self,
        targets: &[SectionId],
        options: ObserveOptions,
        sink: Sender<Batch>,
    ) -> Subscription;
}

// ============================================================================
// Scroll Surface
// ============================================================================

/// How a navigation request moves the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

struct Observation {
    options: ObserveOptions,
    /// Last reported state per target; `None` until first report.
    targets: Vec<(SectionId, Option<bool>)>,
    sink: Sender<Batch>,
    active: Arc<AtomicBool>,
}

#[derive(Debug, Clone, Copy)]
struct SmoothScroll {
    from: i64,
    to: i64,
    frame: u32,
}

impl SmoothScroll {
    /// Ease-in-out cubic position for the current frame.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn position(&self) -> i64 {
        let t = f64::from(self.frame) / f64::from(SMOOTH_SCROLL_FRAMES);
        let eased = if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
        };
        self.from + ((self.to - self.from) as f64 * eased).round() as i64
    }

    const fn done(&self) -> bool {
        self.frame >= SMOOTH_SCROLL_FRAMES
    }
}

/// Document layout plus a scrollable viewport that reports intersections.
pub struct ScrollSurface {
    viewport: Viewport,
    layout: FxHashMap<SectionId, Bounds>,
    content_height: i64,
    observations: Vec<Observation>,
    animation: Option<SmoothScroll>,
}

impl ScrollSurface {
    pub fn new(viewport_height: i64) -> Self {
        Self {
            viewport: Viewport::new(0, viewport_height.max(0)),
            layout: FxHashMap::default(),
            content_height: 0,
            observations: Vec::new(),
            animation: None,
        }
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bounds(&self, id: &SectionId) -> Option<Bounds> {
        self.layout.get(id).copied()
    }

    pub fn max_scroll(&self) -> i64 {
        (self.content_height - self.viewport.height).max(0)
    }

    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Set the geometry of a section. Takes effect at the next [`refresh`](Self::refresh).
    pub fn place(&mut self, id: SectionId, bounds: Bounds) {
        self.layout.insert(id, bounds);
        self.content_height = self
            .layout
            .values()
            .map(|b| b.bottom())
            .max()
            .unwrap_or(0);
    }

    /// Extend the scrollable height beyond the last section (footer etc).
    pub fn set_content_height(&mut self, height: i64) {
        let sections = self.layout.values().map(|b| b.bottom()).max().unwrap_or(0);
        self.content_height = height.max(sections);
    }

    pub fn resize(&mut self, viewport_height: i64) {
        self.viewport.height = viewport_height.max(0);
        self.viewport.scroll_y = self.viewport.scroll_y.clamp(0, self.max_scroll());
        self.refresh();
    }

    /// Jump to `y` (clamped), cancelling any running smooth scroll.
    pub fn scroll_to(&mut self, y: i64) {
        self.animation = None;
        self.set_scroll(y);
    }

    pub fn scroll_by(&mut self, dy: i64) {
        self.scroll_to(self.viewport.scroll_y + dy);
    }

    /// Bring a section's top edge to the top of the viewport.
    ///
    /// Returns `false` (and does nothing) when the section has no geometry.
    pub fn scroll_into_view(&mut self, id: &SectionId, behavior: ScrollBehavior) -> bool {
        let Some(bounds) = self.bounds(id) else {
            return false;
        };
        let target = bounds.top.clamp(0, self.max_scroll());

        match behavior {
            ScrollBehavior::Instant => self.scroll_to(target),
            ScrollBehavior::Smooth => {
                self.animation = Some(SmoothScroll {
                    from: self.viewport.scroll_y,
                    to: target,
                    frame: 0,
                });
            }
        }
        true
    }

    /// Advance a running smooth scroll by one frame.
    ///
    /// Returns `true` while more frames remain.
    pub fn tick(&mut self) -> bool {
        let Some(mut animation) = self.animation.take() else {
            return false;
        };
        animation.frame += 1;
        let done = animation.done();
        if !done {
            self.animation = Some(animation);
        }
        self.set_scroll(animation.position());
        !done
    }

    /// Run a smooth scroll to completion.
    #[cfg(test)]
    pub fn finish_animation(&mut self) {
        while self.tick() {}
    }

    fn set_scroll(&mut self, y: i64) {
        self.viewport.scroll_y = y.clamp(0, self.max_scroll());
        self.refresh();
    }

    /// Recompute intersections and deliver changed entries.
    ///
    /// Cancelled observations and ones whose receiver is gone are dropped.
    pub fn refresh(&mut self) {
        let viewport = self.viewport;
        let layout = &self.layout;

        self.observations.retain_mut(|observation| {
            if !observation.active.load(Ordering::Acquire) {
                return false;
            }

            let mut batch = Batch::new();
            for (id, last) in &mut observation.targets {
                let Some(bounds) = layout.get(id).copied() else {
                    continue;
                };
                let now = observation.options.is_intersecting(bounds, viewport);
                if *last != Some(now) {
                    *last = Some(now);
                    batch.push(IntersectionEntry {
                        id: id.clone(),
                        is_intersecting: now,
                        ratio: observation.options.ratio(bounds, viewport),
                    });
                }
            }

            batch.is_empty() || observation.sink.send(batch).is_ok()
        });
    }
}

impl VisibilitySource for ScrollSurface {
    fn observe(
        &mut self,
        targets: &[SectionId],
        options: ObserveOptions,
        sink: Sender<Batch>,
    ) -> Subscription {
        let (subscription, active) = Subscription::new();
        self.observations.push(Observation {
            options,
            targets: targets.iter().cloned().map(|id| (id, None)).collect(),
            sink,
            active,
        });
        self.refresh();
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn id(s: &str) -> SectionId {
        SectionId::new(s)
    }

    /// Three 1000-tall sections stacked, viewport 800.
    fn surface() -> ScrollSurface {
        let mut surface = ScrollSurface::new(800);
        for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
            surface.place(id(name), Bounds::new(i as i64 * 1000, 1000));
        }
        surface
    }

    fn names(batch: &Batch) -> Vec<(&str, bool)> {
        batch
            .iter()
            .map(|e| (e.id.as_str(), e.is_intersecting))
            .collect()
    }

    #[test]
    fn test_initial_report_covers_every_target() {
        let mut surface = surface();
        let (tx, rx) = mpsc::channel();
        let _sub = surface.observe(&[id("a"), id("b"), id("c")], ObserveOptions::default(), tx);

        let batch = rx.try_recv().unwrap();
        assert_eq!(names(&batch), vec![("a", true), ("b", false), ("c", false)]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_only_changes_are_reported() {
        let mut surface = surface();
        let (tx, rx) = mpsc::channel();
        let _sub = surface.observe(&[id("a"), id("b"), id("c")], ObserveOptions::default(), tx);
        rx.try_recv().unwrap();

        // small scroll, nothing crosses
        surface.scroll_by(10);
        assert!(rx.try_recv().is_err());

        surface.scroll_to(1000);
        let batch = rx.try_recv().unwrap();
        assert_eq!(names(&batch), vec![("a", false), ("b", true)]);
    }

    #[test]
    fn test_targets_without_geometry_are_skipped() {
        let mut surface = surface();
        let (tx, rx) = mpsc::channel();
        let _sub = surface.observe(&[id("a"), id("ghost")], ObserveOptions::default(), tx);

        let batch = rx.try_recv().unwrap();
        assert_eq!(names(&batch), vec![("a", true)]);
    }

    #[test]
    fn test_cancel_stops_delivery() {
        let mut surface = surface();
        let (tx, rx) = mpsc::channel();
        let sub = surface.observe(&[id("a"), id("b")], ObserveOptions::default(), tx);
        rx.try_recv().unwrap();

        sub.cancel();
        assert!(!sub.is_active());
        surface.scroll_to(1000);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_drop_cancels() {
        let mut surface = surface();
        let (tx, rx) = mpsc::channel();
        drop(surface.observe(&[id("a"), id("b")], ObserveOptions::default(), tx));
        rx.try_recv().unwrap();

        surface.scroll_to(1000);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut surface = surface();
        surface.scroll_to(-50);
        assert_eq!(surface.viewport().scroll_y, 0);
        surface.scroll_to(10_000);
        assert_eq!(surface.viewport().scroll_y, 3000 - 800);
    }

    #[test]
    fn test_smooth_scroll_reaches_target() {
        let mut surface = surface();
        assert!(surface.scroll_into_view(&id("b"), ScrollBehavior::Smooth));
        assert!(surface.is_animating());
        assert_eq!(surface.viewport().scroll_y, 0);

        let mut frames = 0;
        while surface.tick() {
            frames += 1;
        }
        assert_eq!(frames + 1, SMOOTH_SCROLL_FRAMES);
        assert_eq!(surface.viewport().scroll_y, 1000);
        assert!(!surface.is_animating());
    }

    #[test]
    fn test_scroll_into_view_unknown_section() {
        let mut surface = surface();
        assert!(!surface.scroll_into_view(&id("missing"), ScrollBehavior::Instant));
        assert_eq!(surface.viewport().scroll_y, 0);
    }

    #[test]
    fn test_manual_scroll_cancels_animation() {
        let mut surface = surface();
        surface.scroll_into_view(&id("c"), ScrollBehavior::Smooth);
        surface.tick();
        surface.scroll_to(0);
        assert!(!surface.is_animating());
        assert!(!surface.tick());
    }

    #[test]
    fn test_resize_reports_changes() {
        let mut surface = surface();
        let (tx, rx) = mpsc::channel();
        let _sub = surface.observe(&[id("a"), id("b")], ObserveOptions::default(), tx);
        rx.try_recv().unwrap();

        // region [0, 1600) now covers 60% of b
        surface.resize(2000);
        let batch = rx.try_recv().unwrap();
        assert_eq!(names(&batch), vec![("b", true)]);
    }

    #[test]
    fn test_dropped_receiver_prunes_observation() {
        let mut surface = surface();
        let (tx, rx) = mpsc::channel();
        let _sub = surface.observe(&[id("a"), id("b")], ObserveOptions::default(), tx);
        drop(rx);

        surface.scroll_to(1000);
        assert!(surface.observations.is_empty());
    }
}
