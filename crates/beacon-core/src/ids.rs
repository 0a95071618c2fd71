//! The synthetic namespaced id that keys the unified feed.
//!
//! Stored notifications and pending invites are server-owned rows with
//! independent integer id spaces, so the client-side unified view needs a
//! key that cannot collide across sources: `"notification-42"` for a
//! stored notification, `"invite-7"` for a pending invite. [`UnifiedId`]
//! is a newtype around that string so a raw id can never be used where a
//! namespaced one is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace prefix for stored notifications.
const NOTIFICATION_PREFIX: &str = "notification";
/// Namespace prefix for pending invites.
const INVITE_PREFIX: &str = "invite";

/// Synthetic id of one [`UnifiedNotificationItem`](crate::UnifiedNotificationItem).
///
/// Exactly one unified item exists per underlying server entity, and this
/// key is what enforces it: observing the same entity twice (once via poll,
/// once via push) produces the same `UnifiedId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnifiedId(String);

impl UnifiedId {
    /// Key for a stored notification with the given server id.
    #[must_use]
    pub fn notification(id: i64) -> Self {
        Self(format!("{NOTIFICATION_PREFIX}-{id}"))
    }

    /// Key for a pending invite with the given server id.
    #[must_use]
    pub fn invite(id: i64) -> Self {
        Self(format!("{INVITE_PREFIX}-{id}"))
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id names a stored notification.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.0.starts_with(NOTIFICATION_PREFIX)
    }

    /// Whether this id names a pending invite.
    #[must_use]
    pub fn is_invite(&self) -> bool {
        self.0.starts_with(INVITE_PREFIX)
    }
}

impl AsRef<str> for UnifiedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
