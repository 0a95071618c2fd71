//! Server-owned collection rows and the client-only unified view model.
//!
//! [`StoredNotification`] and [`PendingInvite`] mirror the REST
//! collections exactly (camelCase wire names). [`UnifiedNotificationItem`]
//! is the client-side merge of both — it is never sent anywhere and never
//! persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UnifiedId;
use crate::kinds::NotificationKind;

/// A persisted notification row from `GET /notifications`.
///
/// Server-owned; `is_read` is mutated only through the explicit mark-read
/// endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNotification {
    /// Server-assigned row id.
    pub id: i64,
    /// Notification category.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Optional in-app route to open on tap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A pending campaign invite from `GET /invites/pending`.
///
/// Has no read state: presence in the pending collection is what "unread"
/// means. Accepting or declining removes it from the next poll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvite {
    /// Server-assigned invite id.
    pub id: i64,
    /// Campaign the invite is for.
    pub campaign_id: i64,
    /// Inviting brand's display name.
    pub company_name: String,
    /// Campaign title.
    pub campaign_title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One entry of the unified feed.
///
/// Client-only view model keyed by [`UnifiedId`]; exactly one item exists
/// per underlying [`StoredNotification`] or [`PendingInvite`] no matter
/// how many times that entity was observed.
#[derive(Clone, Debug, PartialEq)]
pub struct UnifiedNotificationItem {
    /// Synthetic namespaced id.
    pub id: UnifiedId,
    /// Notification category.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Optional in-app route to open on tap.
    pub action_url: Option<String>,
    /// Read state. Local for push-originated items until a poll confirms.
    pub is_read: bool,
    /// Creation timestamp — the feed's sort key.
    pub created_at: DateTime<Utc>,
}

impl UnifiedNotificationItem {
    /// Build the unified view of a stored notification.
    #[must_use]
    pub fn from_stored(n: &StoredNotification) -> Self {
        Self {
            id: UnifiedId::notification(n.id),
            kind: n.kind,
            title: n.title.clone(),
            message: n.message.clone(),
            action_url: n.action_url.clone(),
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }

    /// Build the unified view of a pending invite.
    ///
    /// Invites are unread by construction and carry a route to the
    /// campaign so the user can accept or decline.
    #[must_use]
    pub fn from_invite(invite: &PendingInvite) -> Self {
        Self {
            id: UnifiedId::invite(invite.id),
            kind: NotificationKind::CampaignInvite,
            title: invite.campaign_title.clone(),
            message: format!("{} invited you to this campaign", invite.company_name),
            action_url: Some(format!("/campaigns/{}", invite.campaign_id)),
            is_read: false,
            created_at: invite.created_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn stored(id: i64) -> StoredNotification {
        StoredNotification {
            id,
            kind: NotificationKind::ApplicationAccepted,
            title: "Application accepted".into(),
            message: "Your application was accepted".into(),
            action_url: Some("/applications/3".into()),
            is_read: false,
            created_at: ts(1_700_000_000),
        }
    }

    fn invite(id: i64) -> PendingInvite {
        PendingInvite {
            id,
            campaign_id: 12,
            company_name: "Acme".into(),
            campaign_title: "Summer launch".into(),
            created_at: ts(1_700_000_100),
        }
    }

    #[test]
    fn stored_wire_names_are_camel_case() {
        let json = serde_json::to_value(stored(1)).unwrap();
        assert!(json.get("actionUrl").is_some());
        assert!(json.get("isRead").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["kind"], "application_accepted");
    }

    #[test]
    fn stored_action_url_omitted_when_none() {
        let mut n = stored(1);
        n.action_url = None;
        let json = serde_json::to_string(&n).unwrap();
        assert!(!json.contains("actionUrl"));
    }

    #[test]
    fn stored_deserializes_from_server_shape() {
        let raw = r#"{
            "id": 42,
            "kind": "new_campaign",
            "title": "New campaign",
            "message": "A campaign matching your profile is live",
            "actionUrl": "/campaigns/9",
            "isRead": true,
            "createdAt": "2025-06-01T12:00:00Z"
        }"#;
        let n: StoredNotification = serde_json::from_str(raw).unwrap();
        assert_eq!(n.id, 42);
        assert_eq!(n.kind, NotificationKind::NewCampaign);
        assert!(n.is_read);
    }

    #[test]
    fn invite_deserializes_from_server_shape() {
        let raw = r#"{
            "id": 7,
            "campaignId": 12,
            "companyName": "Acme",
            "campaignTitle": "Summer launch",
            "createdAt": "2025-06-01T12:00:00Z"
        }"#;
        let i: PendingInvite = serde_json::from_str(raw).unwrap();
        assert_eq!(i.id, 7);
        assert_eq!(i.campaign_id, 12);
    }

    #[test]
    fn unified_from_stored_keeps_fields() {
        let n = stored(42);
        let item = UnifiedNotificationItem::from_stored(&n);
        assert_eq!(item.id.as_str(), "notification-42");
        assert_eq!(item.kind, n.kind);
        assert_eq!(item.title, n.title);
        assert_eq!(item.message, n.message);
        assert_eq!(item.action_url, n.action_url);
        assert_eq!(item.is_read, n.is_read);
        assert_eq!(item.created_at, n.created_at);
    }

    #[test]
    fn unified_from_invite_is_unread_with_campaign_route() {
        let item = UnifiedNotificationItem::from_invite(&invite(7));
        assert_eq!(item.id.as_str(), "invite-7");
        assert_eq!(item.kind, NotificationKind::CampaignInvite);
        assert!(!item.is_read);
        assert_eq!(item.action_url.as_deref(), Some("/campaigns/12"));
        assert_eq!(item.title, "Summer launch");
        assert!(item.message.contains("Acme"));
    }

    #[test]
    fn same_entity_observed_twice_yields_same_key() {
        let a = UnifiedNotificationItem::from_stored(&stored(1));
        let b = UnifiedNotificationItem::from_stored(&stored(1));
        assert_eq!(a.id, b.id);
    }

    proptest! {
        #[test]
        fn stored_serde_roundtrip(
            id in any::<i64>(),
            title in ".{0,40}",
            message in ".{0,80}",
            is_read in any::<bool>(),
            secs in 0_i64..4_000_000_000,
        ) {
            let n = StoredNotification {
                id,
                kind: NotificationKind::General,
                title,
                message,
                action_url: None,
                is_read,
                created_at: ts(secs),
            };
            let json = serde_json::to_string(&n).unwrap();
            let back: StoredNotification = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(n, back);
        }
    }
}
