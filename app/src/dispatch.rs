//! Bookkeeping behind the debounced filter requests of a listing.
//!
//! [`FilterDispatcher`] decides whether a change, reset, shortcut or page
//! request turns into a [`Dispatch`], and whether a response is still the
//! latest one when it arrives. It holds no timers itself: the caller arms a
//! [`TimerToken`] on every change and hands it back once the quiet period has
//! elapsed, so a newer token silently supersedes older ones.

use core::time::Duration;

use crate::filter::{FilterSet, QueryParams};

/// Quiet period between the last filter change and its request.
pub const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// What to do with the viewport once a dispatch succeeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollIntent {
    /// Return to the vertical offset captured before the request.
    Restore(f64),
    /// Bring the listing section into view.
    JumpToListing,
}

/// What caused a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The debounce timer armed with this token ran out.
    Settled(TimerToken),
    /// All filters were cleared.
    Reset,
    /// A shortcut replaced the filters and wants the listing in view.
    Jump,
    /// A specific page was requested with the current filters.
    Page(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

/// One outgoing filtered request.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub seq: u64,
    pub params: QueryParams,
    pub scroll: ScrollIntent,
}

#[derive(Debug, Clone)]
pub struct FilterDispatcher<F> {
    applied: F,
    /// Filters of the most recent dispatch, or `applied` when none is in
    /// flight. Kept normalised, so comparing ignores whitespace and selection
    /// order.
    requested: F,
    armed: u64,
    next_seq: u64,
    last_accepted: u64,
}

impl<F: FilterSet> FilterDispatcher<F> {
    /// Starts from the filters the initial page was rendered with.
    #[must_use]
    pub fn new(applied: F) -> Self {
        Self {
            requested: normalised(&applied),
            applied,
            armed: 0,
            next_seq: 1,
            last_accepted: 0,
        }
    }

    /// The filters the currently displayed listing was rendered from.
    #[must_use]
    pub const fn applied(&self) -> &F {
        &self.applied
    }

    /// Arms a new debounce timer, superseding every earlier one.
    pub fn arm(&mut self) -> TimerToken {
        self.armed += 1;
        TimerToken(self.armed)
    }

    /// The single entry point for every filtered request.
    ///
    /// `current` is the filter state at the time of the trigger and
    /// `scroll_offset` the viewport offset to come back to afterwards.
    /// Returns `None` when the trigger is stale or would not change anything.
    pub fn dispatch(&mut self, trigger: Trigger, current: &F, scroll_offset: f64) -> Option<Dispatch> {
        let (params, scroll) = match trigger {
            Trigger::Settled(TimerToken(token)) => {
                if token != self.armed {
                    return None;
                }
                if normalised(current) == self.requested {
                    return None;
                }
                (current.to_params(), ScrollIntent::Restore(scroll_offset))
            }
            Trigger::Reset => (F::default().to_params(), ScrollIntent::JumpToListing),
            Trigger::Jump => (current.to_params(), ScrollIntent::JumpToListing),
            Trigger::Page(page) => (
                current.to_params().with_page(page),
                ScrollIntent::Restore(scroll_offset),
            ),
        };

        // Explicit requests already carry the latest filters, so any pending
        // timer is redundant.
        self.armed += 1;
        self.requested = F::from_params(&params);
        let seq = self.next_seq;
        self.next_seq += 1;
        Some(Dispatch { seq, params, scroll })
    }

    /// Records a successful response. Returns `false` when a newer response
    /// has already been applied, in which case this one must be dropped.
    pub fn accept(&mut self, seq: u64, applied: F) -> bool {
        if seq < self.last_accepted {
            return false;
        }
        self.last_accepted = seq;
        if seq + 1 == self.next_seq {
            self.requested = normalised(&applied);
        }
        self.applied = applied;
        true
    }

    /// Records a failed request. The filters stay as typed; the next change
    /// is compared against what is actually displayed.
    pub fn fail(&mut self, seq: u64) {
        if seq + 1 == self.next_seq {
            self.requested = normalised(&self.applied);
        }
    }
}

/// `filters` as the server would read them back.
fn normalised<F: FilterSet>(filters: &F) -> F {
    F::from_params(&filters.to_params())
}
