//! The [`NotificationKind`] enum — notification category discriminators.
//!
//! Every variant has an exact `#[serde(rename)]` matching the string the
//! server puts in notification payloads (e.g., `"campaign_invite"`). The
//! wire strings are load-bearing: the push channel and the REST collection
//! both use them, and two historical wire shapes carry them in different
//! places, so normalization happens against this single enum.
//!
//! Surface ownership is modeled here too: [`NotificationKind::is_surface_owned()`]
//! identifies kinds that belong exclusively to a dedicated UI surface and
//! must never enter the generic feed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All notification category kinds.
///
/// Each variant serializes to the exact snake_case string the server emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    // -- Campaign flow --
    /// A brand invited the creator to a campaign.
    #[serde(rename = "campaign_invite")]
    CampaignInvite,
    /// The creator's application was accepted.
    #[serde(rename = "application_accepted")]
    ApplicationAccepted,
    /// The creator's application was rejected.
    #[serde(rename = "application_rejected")]
    ApplicationRejected,
    /// A new campaign matching the creator's profile was published.
    #[serde(rename = "new_campaign")]
    NewCampaign,
    /// A creator applied to one of the brand's campaigns.
    #[serde(rename = "new_applicant")]
    NewApplicant,

    // -- Messaging --
    /// A direct message arrived.
    #[serde(rename = "message")]
    Message,

    // -- Contracts --
    /// A contract was issued.
    #[serde(rename = "contract_created")]
    ContractCreated,
    /// A contract was signed by the counterparty.
    #[serde(rename = "contract_signed")]
    ContractSigned,

    // -- Deliverables --
    /// A deliverable was submitted.
    #[serde(rename = "deliverable_created")]
    DeliverableCreated,
    /// A deliverable was approved.
    #[serde(rename = "deliverable_approved")]
    DeliverableApproved,
    /// A deliverable was rejected.
    #[serde(rename = "deliverable_rejected")]
    DeliverableRejected,

    // -- Social --
    /// A tracked Instagram post was detected.
    #[serde(rename = "new_instagram_post")]
    NewInstagramPost,

    // -- Community --
    /// Someone asked to join the brand's community.
    #[serde(rename = "community_join_request")]
    CommunityJoinRequest,
    /// A member joined the community.
    #[serde(rename = "community_member_joined")]
    CommunityMemberJoined,

    // -- Fallback --
    /// Uncategorized announcement.
    #[serde(rename = "general")]
    General,
}

/// All notification kinds in definition order, for exhaustive testing.
pub const ALL_NOTIFICATION_KINDS: [NotificationKind; 15] = [
    NotificationKind::CampaignInvite,
    NotificationKind::ApplicationAccepted,
    NotificationKind::ApplicationRejected,
    NotificationKind::NewCampaign,
    NotificationKind::NewApplicant,
    NotificationKind::Message,
    NotificationKind::ContractCreated,
    NotificationKind::ContractSigned,
    NotificationKind::DeliverableCreated,
    NotificationKind::DeliverableApproved,
    NotificationKind::DeliverableRejected,
    NotificationKind::NewInstagramPost,
    NotificationKind::CommunityJoinRequest,
    NotificationKind::CommunityMemberJoined,
    NotificationKind::General,
];

impl NotificationKind {
    /// Return the canonical wire string (e.g., `"campaign_invite"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CampaignInvite => "campaign_invite",
            Self::ApplicationAccepted => "application_accepted",
            Self::ApplicationRejected => "application_rejected",
            Self::NewCampaign => "new_campaign",
            Self::NewApplicant => "new_applicant",
            Self::Message => "message",
            Self::ContractCreated => "contract_created",
            Self::ContractSigned => "contract_signed",
            Self::DeliverableCreated => "deliverable_created",
            Self::DeliverableApproved => "deliverable_approved",
            Self::DeliverableRejected => "deliverable_rejected",
            Self::NewInstagramPost => "new_instagram_post",
            Self::CommunityJoinRequest => "community_join_request",
            Self::CommunityMemberJoined => "community_member_joined",
            Self::General => "general",
        }
    }

    /// Whether this kind is owned exclusively by a dedicated UI surface.
    ///
    /// `campaign_invite` belongs to the invite list and `message` to the
    /// inbox. Both may arrive on the shared push channel, but neither may
    /// enter the generic notification feed — the invite would double-count
    /// against the pending-invite collection, and messages render in the
    /// inbox only.
    #[must_use]
    pub fn is_surface_owned(self) -> bool {
        matches!(self, Self::CampaignInvite | Self::Message)
    }

    /// Whether this kind concerns the applications collections.
    #[must_use]
    pub fn is_application_kind(self) -> bool {
        matches!(
            self,
            Self::NewApplicant | Self::ApplicationAccepted | Self::ApplicationRejected
        )
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Serde is the source of truth — the `#[serde(rename)]` attributes.
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown notification kind: {s}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
