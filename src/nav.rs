//! Page navigation: the fixed section order, nav highlighting and the mobile menu.
//!
//! Navigation only *reads* the tracker. A click asks the scroll surface to
//! bring the section into view; the active section follows once the next
//! intersection report arrives.

use crate::tracker::{ScrollBehavior, ScrollSurface, SectionId, SectionTracker};

/// A clickable link to a page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEntry {
    pub label: &'static str,
    pub target: &'static str,
}

/// Top-bar / menu entries, in page order.
pub const NAVIGATION: [NavigationEntry; 5] = [
    NavigationEntry { label: "Home", target: "intro" },
    NavigationEntry { label: "Experience", target: "work" },
    NavigationEntry { label: "Projects", target: "projects" },
    NavigationEntry { label: "Education", target: "education" },
    NavigationEntry { label: "Contact", target: "connect" },
];

/// Every tracked section of the home page, in page order.
///
/// `thoughts` has no nav entry: while it is active no control is current.
pub const SECTIONS: [&str; 6] = ["intro", "work", "projects", "education", "thoughts", "connect"];

/// Section identifiers in registration order.
pub fn sections() -> impl Iterator<Item = SectionId> {
    SECTIONS.into_iter().map(SectionId::new)
}

/// Visual state of a nav control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Current,
    Idle,
}

impl NavigationEntry {
    pub fn state(&self, tracker: &SectionTracker) -> NavState {
        if tracker.is_active(self.target) {
            NavState::Current
        } else {
            NavState::Idle
        }
    }

    /// Entry bound to a digit key (`1` = first).
    pub fn for_digit(key: char) -> Option<&'static Self> {
        let n = key.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| NAVIGATION.get(i))
    }
}

/// Click handler: smooth-scroll to `target`. Returns `false` if it has no node.
pub fn jump_to(surface: &mut ScrollSurface, target: &str) -> bool {
    surface.scroll_into_view(&SectionId::new(target), ScrollBehavior::Smooth)
}

// ============================================================================
// Mobile Menu
// ============================================================================

/// Open/closed state of the compact menu with a highlighted row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
    cursor: usize,
}

impl MobileMenu {
    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Open the menu with the cursor on the active entry (or the first).
    pub fn toggle(&mut self, tracker: &SectionTracker) {
        self.open = !self.open;
        if self.open {
            self.cursor = NAVIGATION
                .iter()
                .position(|e| e.state(tracker) == NavState::Current)
                .unwrap_or(0);
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let last = NAVIGATION.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// Pick the highlighted entry, closing the menu.
    pub fn select(&mut self) -> Option<&'static NavigationEntry> {
        if !self.open {
            return None;
        }
        self.open = false;
        NAVIGATION.get(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Bounds;

    /// Page laid out like the home page: every section one screen tall or more.
    fn page_with(ids: &[&str]) -> (ScrollSurface, SectionTracker) {
        let mut surface = ScrollSurface::new(800);
        let mut tracker = SectionTracker::new(sections());
        for (i, id) in ids.iter().enumerate() {
            surface.place(SectionId::new(*id), Bounds::new(i as i64 * 1000, 1000));
            tracker.attach(id);
        }
        tracker.mount(&mut surface);
        tracker.pump();
        (surface, tracker)
    }

    /// Home page without a thoughts section.
    fn page() -> (ScrollSurface, SectionTracker) {
        let ids: Vec<&str> = NAVIGATION.iter().map(|e| e.target).collect();
        page_with(&ids)
    }

    #[test]
    fn test_section_order() {
        let ids: Vec<_> = sections().map(|s| s.to_string()).collect();
        assert_eq!(ids, ["intro", "work", "projects", "education", "thoughts", "connect"]);
        assert!(NAVIGATION.iter().all(|e| SECTIONS.contains(&e.target)));
    }

    #[test]
    fn test_no_current_entry_while_thoughts_active() {
        let (mut surface, mut tracker) = page_with(&SECTIONS);
        assert!(jump_to(&mut surface, "thoughts"));
        surface.finish_animation();
        tracker.pump();

        assert!(tracker.is_active("thoughts"));
        assert!(NAVIGATION.iter().all(|e| e.state(&tracker) == NavState::Idle));

        let mut menu = MobileMenu::default();
        menu.toggle(&tracker);
        assert_eq!(menu.cursor(), 0);

        surface.scroll_to(5000);
        tracker.pump();
        assert!(tracker.is_revealed("thoughts"));
        assert_eq!(NAVIGATION[4].state(&tracker), NavState::Current);
    }

    #[test]
    fn test_click_eventually_activates_target() {
        let (mut surface, mut tracker) = page();
        assert!(tracker.is_active("intro"));

        assert!(jump_to(&mut surface, "projects"));
        // not synchronous
        assert!(tracker.is_active("intro"));

        surface.finish_animation();
        tracker.pump();
        assert!(tracker.is_active("projects"));
        assert_eq!(NAVIGATION[2].state(&tracker), NavState::Current);
        assert_eq!(NAVIGATION[0].state(&tracker), NavState::Idle);
    }

    #[test]
    fn test_click_on_missing_section() {
        let (mut surface, mut tracker) = page();
        assert!(!jump_to(&mut surface, "thoughts"));
        tracker.pump();
        assert!(tracker.is_active("intro"));
    }

    #[test]
    fn test_exactly_one_current_entry() {
        let (mut surface, mut tracker) = page();
        for y in (0..=4000).step_by(250) {
            surface.scroll_to(y);
            tracker.pump();
            let current = NAVIGATION
                .iter()
                .filter(|e| e.state(&tracker) == NavState::Current)
                .count();
            assert_eq!(current, 1);
        }
    }

    #[test]
    fn test_digit_lookup() {
        assert_eq!(NavigationEntry::for_digit('1').unwrap().target, "intro");
        assert_eq!(NavigationEntry::for_digit('5').unwrap().target, "connect");
        assert!(NavigationEntry::for_digit('0').is_none());
        assert!(NavigationEntry::for_digit('6').is_none());
        assert!(NavigationEntry::for_digit('x').is_none());
    }

    #[test]
    fn test_mobile_menu_opens_on_active_entry() {
        let (mut surface, mut tracker) = page();
        surface.scroll_to(3000);
        tracker.pump();

        let mut menu = MobileMenu::default();
        menu.toggle(&tracker);
        assert!(menu.is_open());
        assert_eq!(menu.cursor(), 3);

        menu.move_cursor(10);
        assert_eq!(menu.cursor(), 4);
        menu.move_cursor(-10);
        assert_eq!(menu.cursor(), 0);

        assert_eq!(menu.select().unwrap().target, "intro");
        assert!(!menu.is_open());
        assert!(menu.select().is_none());
    }

    #[test]
    fn test_mobile_menu_toggle_closes() {
        let (_, tracker) = page();
        let mut menu = MobileMenu::default();
        menu.toggle(&tracker);
        menu.toggle(&tracker);
        assert!(!menu.is_open());
        menu.toggle(&tracker);
        menu.close();
        assert!(!menu.is_open());
    }
}
