//! Per-surface unread counters.
//!
//! Each surface polls its own count endpoint and reacts to invalidation
//! independently. The combined total is always computed as the sum of the
//! surfaces — never stored — so it cannot drift from its parts.

use std::sync::atomic::{AtomicU64, Ordering};

use beacon_events::CacheKey;

/// A UI feature with its own unread counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The generic notification feed.
    Notifications,
    /// The campaign invite list.
    Invites,
    /// The direct-message inbox.
    Messages,
}

/// All surfaces in definition order.
pub const ALL_SURFACES: [Surface; 3] = [
    Surface::Notifications,
    Surface::Invites,
    Surface::Messages,
];

impl Surface {
    /// The cache key naming this surface's count query.
    #[must_use]
    pub fn count_key(self) -> CacheKey {
        match self {
            Self::Notifications => CacheKey::of("notifications:unread-count"),
            Self::Invites => CacheKey::of("invites:count"),
            Self::Messages => CacheKey::of("messages:unread-count"),
        }
    }

    /// The surface whose count query a cache key names, if any.
    #[must_use]
    pub fn for_key(key: &CacheKey) -> Option<Self> {
        ALL_SURFACES
            .into_iter()
            .find(|surface| surface.count_key() == *key)
    }

    fn index(self) -> usize {
        match self {
            Self::Notifications => 0,
            Self::Invites => 1,
            Self::Messages => 2,
        }
    }
}

/// Current unread counts, one slot per surface.
///
/// Counts start at zero (the safe first-load default) and only change
/// when a fetch succeeds — a failed refresh keeps the last known value.
#[derive(Debug, Default)]
pub struct BadgeState {
    counts: [AtomicU64; 3],
}

impl BadgeState {
    /// Create with every surface at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for one surface.
    #[must_use]
    pub fn count(&self, surface: Surface) -> u64 {
        self.counts[surface.index()].load(Ordering::Relaxed)
    }

    /// Store a freshly fetched count for one surface.
    pub fn set(&self, surface: Surface, count: u64) {
        self.counts[surface.index()].store(count, Ordering::Relaxed);
    }

    /// The combined badge: the sum of every surface, recomputed on read.
    #[must_use]
    pub fn total(&self) -> u64 {
        ALL_SURFACES
            .into_iter()
            .map(|surface| self.count(surface))
            .sum()
    }
}
