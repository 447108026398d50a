//! Scroll position handling around filtered requests.
//!
//! Routine requests restore the offset captured before they were sent. Resets
//! and shortcuts instead raise a one-shot flag that survives a reload; the
//! listing takes it when it mounts or when a request lands, and scrolls its
//! section into view once.

use leptos::prelude::{document, window};
use std::collections::BTreeSet;
use std::sync::Mutex;
use web_sys::{ScrollBehavior, ScrollToOptions};

use crate::dispatch::ScrollIntent;

/// `id` of the section wrapping every listing.
pub const LISTING_SECTION_ID: &str = "listing";

/// Flag asking the next listing to bring itself into view.
pub const JUMP_FLAG: &str = "listing:jump";

/// Transient flags that are cleared by the read that observes them.
#[cfg_attr(test, mockall::automock)]
pub trait FlagStore {
    fn raise(&self, key: &str);

    /// Returns whether `key` was raised, clearing it in the same step.
    fn take(&self, key: &str) -> bool;
}

/// Flags held in memory for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryFlags {
    raised: Mutex<BTreeSet<String>>,
}

impl FlagStore for MemoryFlags {
    fn raise(&self, key: &str) {
        if let Ok(mut raised) = self.raised.lock() {
            raised.insert(key.to_owned());
        }
    }

    fn take(&self, key: &str) -> bool {
        self.raised
            .lock()
            .map(|mut raised| raised.remove(key))
            .unwrap_or(false)
    }
}

/// Flags kept in the tab's `sessionStorage`. Browser only.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionFlags;

impl SessionFlags {
    fn storage() -> Option<web_sys::Storage> {
        window().session_storage().ok().flatten()
    }
}

impl FlagStore for SessionFlags {
    fn raise(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(key, "1");
        }
    }

    fn take(&self, key: &str) -> bool {
        let Some(storage) = Self::storage() else {
            return false;
        };
        let raised = storage.get_item(key).ok().flatten().is_some();
        if raised {
            let _ = storage.remove_item(key);
        }
        raised
    }
}

/// What the viewport should do after a request lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAction {
    RestoreTo(f64),
    JumpToListing,
    Stay,
}

/// Raises the jump flag for dispatches that want the listing in view.
pub fn before_dispatch(intent: ScrollIntent, flags: &impl FlagStore) {
    if intent == ScrollIntent::JumpToListing {
        flags.raise(JUMP_FLAG);
    }
}

/// Decides the scroll action for a successful request, consuming the flag.
pub fn after_dispatch(intent: ScrollIntent, flags: &impl FlagStore) -> ScrollAction {
    if flags.take(JUMP_FLAG) {
        return ScrollAction::JumpToListing;
    }
    match intent {
        ScrollIntent::Restore(offset) => ScrollAction::RestoreTo(offset),
        ScrollIntent::JumpToListing => ScrollAction::Stay,
    }
}

/// Withdraws the flag raised for a jump whose request failed, so the next
/// routine request restores its offset again.
pub fn after_failure(intent: ScrollIntent, flags: &impl FlagStore) {
    if intent == ScrollIntent::JumpToListing {
        flags.take(JUMP_FLAG);
    }
}

/// Decides the scroll action when a listing mounts, consuming the flag.
pub fn on_mount(flags: &impl FlagStore) -> ScrollAction {
    if flags.take(JUMP_FLAG) {
        ScrollAction::JumpToListing
    } else {
        ScrollAction::Stay
    }
}

/// Current vertical scroll offset of the window.
#[must_use]
pub fn offset() -> f64 {
    window().scroll_y().unwrap_or_default()
}

/// Carries out `action` in the browser.
pub fn perform(action: ScrollAction) {
    match action {
        ScrollAction::RestoreTo(offset) => window().scroll_to_with_x_and_y(0.0, offset),
        ScrollAction::JumpToListing => {
            let Some(section) = document().get_element_by_id(LISTING_SECTION_ID) else {
                return;
            };
            let options = ScrollToOptions::new();
            options.set_top(section.get_bounding_client_rect().top() + offset());
            options.set_behavior(ScrollBehavior::Smooth);
            window().scroll_to_with_scroll_to_options(&options);
        }
        ScrollAction::Stay => {}
    }
}
