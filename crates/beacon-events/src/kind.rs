//! Event kind discriminators for the push channel.
//!
//! Two families of events share one channel. Notification-carried events
//! use the snake_case strings of
//! [`NotificationKind`](beacon_core::NotificationKind) and arrive either
//! flat or wrapped in a `{"type":"notification","data":{...}}` envelope.
//! Out-of-band structural events ([`StructuralKind`]) are never wrapped
//! and mostly use colon-form strings. [`EventKind`] is the normalized
//! union both are classified into.

use beacon_core::NotificationKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Out-of-band structural event kinds.
///
/// These describe entity changes rather than user-facing notifications;
/// their only consumer is the cache invalidation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralKind {
    /// A campaign briefing was edited.
    #[serde(rename = "campaign:briefing_updated")]
    CampaignBriefingUpdated,
    /// A deliverable was created under an application.
    #[serde(rename = "deliverable:created")]
    DeliverableCreated,
    /// A comment was added to a deliverable.
    #[serde(rename = "deliverable:comment_created")]
    DeliverableCommentCreated,
    /// An application was submitted to a campaign.
    #[serde(rename = "application:created")]
    ApplicationCreated,
    /// Progress of a direct-message history sync.
    #[serde(rename = "dm_sync_progress")]
    DmSyncProgress,
    /// An Instagram direct message arrived.
    #[serde(rename = "instagram_dm")]
    InstagramDm,
}

/// All structural kinds in definition order, for exhaustive testing.
pub const ALL_STRUCTURAL_KINDS: [StructuralKind; 6] = [
    StructuralKind::CampaignBriefingUpdated,
    StructuralKind::DeliverableCreated,
    StructuralKind::DeliverableCommentCreated,
    StructuralKind::ApplicationCreated,
    StructuralKind::DmSyncProgress,
    StructuralKind::InstagramDm,
];

impl StructuralKind {
    /// Return the canonical wire string (e.g., `"deliverable:created"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CampaignBriefingUpdated => "campaign:briefing_updated",
            Self::DeliverableCreated => "deliverable:created",
            Self::DeliverableCommentCreated => "deliverable:comment_created",
            Self::ApplicationCreated => "application:created",
            Self::DmSyncProgress => "dm_sync_progress",
            Self::InstagramDm => "instagram_dm",
        }
    }
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StructuralKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown structural kind: {s}"))
    }
}

/// Normalized discriminant of one inbound event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A notification-carried event.
    Notification(NotificationKind),
    /// An out-of-band structural event.
    Structural(StructuralKind),
}

impl EventKind {
    /// The canonical wire string of the underlying kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notification(k) => k.as_str(),
            Self::Structural(k) => k.as_str(),
        }
    }

    /// The notification kind, if this is a notification-carried event.
    #[must_use]
    pub fn notification(self) -> Option<NotificationKind> {
        match self {
            Self::Notification(k) => Some(k),
            Self::Structural(_) => None,
        }
    }

    /// Whether this is an out-of-band structural event.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Structural(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(k) = s.parse::<NotificationKind>() {
            return Ok(Self::Notification(k));
        }
        if let Ok(k) = s.parse::<StructuralKind>() {
            return Ok(Self::Structural(k));
        }
        Err(format!("unknown event kind: {s}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
