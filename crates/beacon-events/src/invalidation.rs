//! The declarative event-kind → cache-key invalidation table.
//!
//! [`keys_for`] is pure: it names the client-cached queries an event makes
//! stale, and the caller decides how to refetch them. Keys may be
//! parameterized by correlation ids carried in the envelope.

use serde_json::Value;
use std::fmt;

use beacon_core::NotificationKind;

use crate::envelope::EventEnvelope;
use crate::kind::{EventKind, StructuralKind};

/// Opaque identifier of one client-cached query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// A collection-level key, e.g. `campaigns`.
    #[must_use]
    pub fn of(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// A key parameterized by an entity id, e.g. `campaigns:briefing:3`.
    #[must_use]
    pub fn scoped(name: &str, id: i64) -> Self {
        Self(format!("{name}:{id}"))
    }

    /// Return the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unread-message badge and conversation-list keys.
fn message_keys() -> Vec<CacheKey> {
    vec![
        CacheKey::of("messages:unread-count"),
        CacheKey::of("messages:unread-conversations"),
    ]
}

/// Key for a scoped query, falling back to the whole collection when the
/// event did not carry the id to parameterize with.
fn scoped_or_broad(name: &str, id: Option<i64>) -> CacheKey {
    id.map_or_else(|| CacheKey::of(name), |id| CacheKey::scoped(name, id))
}

/// The cache keys made stale by one classified event.
///
/// Pure and side-effect free; the caller triggers the refetches.
#[must_use]
pub fn keys_for(envelope: &EventEnvelope) -> Vec<CacheKey> {
    match envelope.kind {
        EventKind::Notification(kind) => notification_keys(kind),
        EventKind::Structural(kind) => structural_keys(kind, envelope),
    }
}

fn notification_keys(kind: NotificationKind) -> Vec<CacheKey> {
    let mut keys = match kind {
        NotificationKind::CampaignInvite => vec![
            CacheKey::of("invites"),
            CacheKey::of("invites:pending"),
            CacheKey::of("invites:count"),
        ],
        NotificationKind::Message => message_keys(),
        NotificationKind::NewCampaign => vec![CacheKey::of("campaigns")],
        k if k.is_application_kind() => vec![
            CacheKey::of("applications"),
            CacheKey::of("applications:active"),
        ],
        _ => Vec::new(),
    };
    // Every kind that lands in the generic feed also moves its badge.
    if !kind.is_surface_owned() {
        keys.push(CacheKey::of("notifications:unread-count"));
    }
    keys
}

fn structural_keys(kind: StructuralKind, envelope: &EventEnvelope) -> Vec<CacheKey> {
    let ids = envelope.correlation;
    match kind {
        StructuralKind::CampaignBriefingUpdated => {
            vec![scoped_or_broad("campaigns:briefing", ids.campaign_id)]
        }
        StructuralKind::ApplicationCreated => {
            vec![scoped_or_broad("campaigns:applications", ids.campaign_id)]
        }
        StructuralKind::DeliverableCreated => vec![
            scoped_or_broad("campaigns:applications", ids.campaign_id),
            scoped_or_broad("applications:deliverables", ids.application_id),
        ],
        StructuralKind::DeliverableCommentCreated => {
            vec![scoped_or_broad("deliverables:comments", ids.deliverable_id)]
        }
        StructuralKind::InstagramDm => message_keys(),
        StructuralKind::DmSyncProgress => {
            // Only a completed sync changes what the inbox should show.
            if envelope.payload.get("done").and_then(Value::as_bool) == Some(true) {
                message_keys()
            } else {
                Vec::new()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
