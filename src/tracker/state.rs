//! Active-section state and per-section reveal flags.

use super::{
    SectionId,
    geometry::ObserveOptions,
    source::{Batch, IntersectionEntry, Subscription, VisibilitySource},
};
use rustc_hash::FxHashMap;
use std::sync::mpsc::{self, Receiver};

/// A registered page section.
#[derive(Debug, Clone)]
pub struct Section {
    id: SectionId,
    /// Page composition supplied a node for this section.
    attached: bool,
    /// Handed to the visibility source at mount.
    observed: bool,
    /// One-way: false → true.
    revealed: bool,
}

impl Section {
    fn new(id: SectionId) -> Self {
        Self {
            id,
            attached: false,
            observed: false,
            revealed: false,
        }
    }

    #[cfg(test)]
    pub const fn is_observed(&self) -> bool {
        self.observed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Composing,
    Mounted,
    TornDown,
}

/// Owns the active section and reveal flags for one page.
///
/// Lifecycle: register sections → [`attach`](Self::attach) the ones that
/// rendered → [`mount`](Self::mount) on a visibility source → [`pump`](Self::pump)
/// deliveries → [`teardown`](Self::teardown).
pub struct SectionTracker {
    sections: Vec<Section>,
    index: FxHashMap<SectionId, usize>,
    active: Option<usize>,
    options: ObserveOptions,
    inbox: Option<Receiver<Batch>>,
    subscription: Option<Subscription>,
    phase: Phase,
}

impl SectionTracker {
    /// Register sections in page order. Repeated identifiers are ignored.
    pub fn new(ids: impl IntoIterator<Item = SectionId>) -> Self {
        let mut sections = Vec::new();
        let mut index = FxHashMap::default();
        for id in ids {
            if !index.contains_key(&id) {
                index.insert(id.clone(), sections.len());
                sections.push(Section::new(id));
            }
        }

        Self {
            sections,
            index,
            active: None,
            options: ObserveOptions::default(),
            inbox: None,
            subscription: None,
            phase: Phase::Composing,
        }
    }

    /// Record that the page rendered a node for `id`.
    ///
    /// Only effective before mount; returns whether the node was accepted.
    pub fn attach(&mut self, id: &str) -> bool {
        if self.phase != Phase::Composing {
            return false;
        }
        match self.index.get(id) {
            Some(&i) => {
                self.sections[i].attached = true;
                true
            }
            None => false,
        }
    }

    /// Start observing every attached section.
    ///
    /// Sections without a node are never observed and can never become active.
    /// Mounting twice is a no-op.
    pub fn mount(&mut self, source: &mut impl VisibilitySource) {
        if self.phase != Phase::Composing {
            return;
        }

        let targets: Vec<SectionId> = self
            .sections
            .iter_mut()
            .filter(|s| s.attached)
            .map(|s| {
                s.observed = true;
                s.id.clone()
            })
            .collect();

        let (tx, rx) = mpsc::channel();
        self.subscription = Some(source.observe(&targets, self.options, tx));
        self.inbox = Some(rx);
        self.phase = Phase::Mounted;
    }

    /// Drain queued batches and apply them in order. Returns the batch count.
    ///
    /// After teardown, stray batches are still drained but change nothing.
    pub fn pump(&mut self) -> usize {
        let batches: Vec<Batch> = match &self.inbox {
            Some(rx) => rx.try_iter().collect(),
            None => return 0,
        };
        for batch in &batches {
            self.apply(batch);
        }
        batches.len()
    }

    /// Apply one batch. Returns `true` if the active section or a reveal flag changed.
    ///
    /// Each intersecting entry reveals its section and becomes active; the
    /// last one in delivery order wins. Entries for sections that are not
    /// observed are ignored.
    pub fn apply(&mut self, batch: &[IntersectionEntry]) -> bool {
        if self.phase != Phase::Mounted {
            return false;
        }

        let mut changed = false;
        for entry in batch.iter().filter(|e| e.is_intersecting) {
            let Some(&i) = self.index.get(&entry.id) else {
                continue;
            };
            let section = &mut self.sections[i];
            if !section.observed {
                continue;
            }
            changed |= !section.revealed;
            section.revealed = true;
            changed |= self.active != Some(i);
            self.active = Some(i);
        }
        changed
    }

    /// Stop observing. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.phase = Phase::TornDown;
    }

    pub fn active(&self) -> Option<&SectionId> {
        self.active.map(|i| &self.sections[i].id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active().is_some_and(|active| active.as_str() == id)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&i| self.sections[i].revealed)
    }

    #[cfg(test)]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.phase == Phase::Mounted
    }
}

impl Drop for SectionTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}
