//! The unified unread model: push overlay merged with authoritative polls.
//!
//! Two keyed maps, one per source. The stored map is fed by both the
//! stored-notification poll and push upserts; the pending map only ever
//! comes from the pending-invite poll. A poll snapshot replaces its
//! source's map wholesale — poll is authoritative and self-healing (an
//! accepted invite simply stops appearing) — while a push only upserts a
//! single provisional item that the next poll reconciles.
//!
//! Read state is the one field the server does not win outright: a
//! locally-marked-read item stays read until the server catches up, and a
//! server-read flag always sticks (`is_read = server || local`).

use std::collections::HashMap;

use tracing::debug;

use beacon_core::{
    PendingInvite, StoredNotification, UnifiedId, UnifiedNotificationItem,
};

/// One authoritative poll snapshot.
pub enum PollSnapshot<'a> {
    /// The stored-notification collection (`GET /notifications`).
    Stored(&'a [StoredNotification]),
    /// The pending-invite collection (`GET /invites/pending`).
    Pending(&'a [PendingInvite]),
}

/// Merges pushed items and polled collections into one unread model.
#[derive(Debug, Default)]
pub struct NotificationAggregator {
    stored: HashMap<UnifiedId, UnifiedNotificationItem>,
    pending: HashMap<UnifiedId, UnifiedNotificationItem>,
}

impl NotificationAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert one pushed notification.
    ///
    /// Returns `false` when the item was rejected because its kind is
    /// owned by a dedicated surface (invite list, message inbox) — those
    /// never enter the generic feed. Two pushes for the same id resolve
    /// last-write-wins on content; read state is OR-merged so a pushed
    /// duplicate can never un-read an item.
    pub fn ingest_push(&mut self, notification: &StoredNotification) -> bool {
        if notification.kind.is_surface_owned() {
            debug!(kind = %notification.kind, "push belongs to a dedicated surface, skipping feed");
            return false;
        }
        let id = UnifiedId::notification(notification.id);
        let mut item = UnifiedNotificationItem::from_stored(notification);
        if let Some(existing) = self.stored.get(&id) {
            item.is_read = item.is_read || existing.is_read;
        }
        let _ = self.stored.insert(id, item);
        true
    }

    /// Replace one source's map with an authoritative snapshot.
    pub fn ingest_poll(&mut self, snapshot: PollSnapshot<'_>) {
        match snapshot {
            PollSnapshot::Stored(items) => self.replace_stored(items),
            PollSnapshot::Pending(invites) => self.replace_pending(invites),
        }
    }

    fn replace_stored(&mut self, items: &[StoredNotification]) {
        let mut next = HashMap::with_capacity(items.len());
        for notification in items {
            if notification.kind.is_surface_owned() {
                continue;
            }
            let id = UnifiedId::notification(notification.id);
            let mut item = UnifiedNotificationItem::from_stored(notification);
            // Poll wins on content; local read state survives until the
            // server itself says read.
            if let Some(previous) = self.stored.get(&id) {
                item.is_read = item.is_read || previous.is_read;
            }
            let _ = next.insert(id, item);
        }
        self.stored = next;
    }

    fn replace_pending(&mut self, invites: &[PendingInvite]) {
        self.pending = invites
            .iter()
            .map(|invite| {
                (
                    UnifiedId::invite(invite.id),
                    UnifiedNotificationItem::from_invite(invite),
                )
            })
            .collect();
    }

    /// Mark one item read. Idempotent; unknown ids and pending invites
    /// are no-ops (invites are resolved by accept/decline, not reading).
    pub fn mark_read(&mut self, id: &UnifiedId) {
        if let Some(item) = self.stored.get_mut(id) {
            item.is_read = true;
        }
    }

    /// Mark every stored item read. Pending invites are untouched.
    pub fn mark_all_read(&mut self) {
        for item in self.stored.values_mut() {
            item.is_read = true;
        }
    }

    /// The unified feed, sorted by creation time descending.
    ///
    /// Sorting happens at read time — insertion order is irrelevant, so
    /// out-of-order pushes and interleaved polls cannot corrupt the view.
    #[must_use]
    pub fn feed(&self) -> Vec<UnifiedNotificationItem> {
        let mut items: Vec<UnifiedNotificationItem> = self
            .stored
            .values()
            .chain(self.pending.values())
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_str().cmp(a.id.as_str()))
        });
        items
    }

    /// Unread stored items plus every pending invite.
    ///
    /// A pure function of current state — never incremented or
    /// decremented independently, so it cannot drift.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        let unread_stored = self.stored.values().filter(|item| !item.is_read).count();
        unread_stored + self.pending.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
