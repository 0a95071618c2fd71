//! The [`MarketplaceApi`] trait and its `reqwest` implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;

use beacon_core::{PendingInvite, StoredNotification};

use crate::error::ApiError;

/// One row of `GET /messages/unread-conversations`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Conversation id.
    pub id: i64,
    /// Counterparty display name.
    pub participant_name: String,
    /// Preview of the latest message.
    pub last_message: String,
    /// Unread messages in this conversation.
    pub unread_count: u32,
    /// Timestamp of the latest message.
    pub updated_at: DateTime<Utc>,
}

/// Count payload shared by the `*-count` endpoints.
#[derive(Clone, Copy, Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

/// The REST collaborators of the realtime layer.
///
/// Implementations report failures faithfully; callers that need a safe
/// default (zero count, empty collection) apply it themselves.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Latest stored notifications, newest first.
    async fn notifications(&self, limit: usize) -> Result<Vec<StoredNotification>, ApiError>;

    /// Count of unread stored notifications.
    async fn unread_count(&self) -> Result<u64, ApiError>;

    /// Mark one stored notification read.
    async fn mark_read(&self, id: i64) -> Result<(), ApiError>;

    /// Mark every stored notification read.
    async fn mark_all_read(&self) -> Result<(), ApiError>;

    /// Pending campaign invites.
    async fn pending_invites(&self) -> Result<Vec<PendingInvite>, ApiError>;

    /// Count of pending campaign invites.
    async fn invite_count(&self) -> Result<u64, ApiError>;

    /// Count of unread direct messages.
    async fn unread_message_count(&self) -> Result<u64, ApiError>;

    /// Conversations with unread messages.
    async fn unread_conversations(&self) -> Result<Vec<ConversationSummary>, ApiError>;
}

/// `reqwest` implementation of [`MarketplaceApi`].
pub struct HttpMarketplaceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMarketplaceApi {
    /// Build a client against the given base URL with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Build)?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            let _ = base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_owned(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            endpoint: path.to_owned(),
            source,
        })
    }

    async fn patch_ok(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "PATCH");
        let response = self
            .client
            .patch(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn notifications(&self, limit: usize) -> Result<Vec<StoredNotification>, ApiError> {
        self.get_json(&format!("/notifications?limit={limit}")).await
    }

    async fn unread_count(&self) -> Result<u64, ApiError> {
        let response: CountResponse = self.get_json("/notifications/unread-count").await?;
        Ok(response.count)
    }

    async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        self.patch_ok(&format!("/notifications/{id}/read")).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.patch_ok("/notifications/read-all").await
    }

    async fn pending_invites(&self) -> Result<Vec<PendingInvite>, ApiError> {
        self.get_json("/invites/pending").await
    }

    async fn invite_count(&self) -> Result<u64, ApiError> {
        let response: CountResponse = self.get_json("/invites/count").await?;
        Ok(response.count)
    }

    async fn unread_message_count(&self) -> Result<u64, ApiError> {
        let response: CountResponse = self.get_json("/messages/unread-count").await?;
        Ok(response.count)
    }

    async fn unread_conversations(&self) -> Result<Vec<ConversationSummary>, ApiError> {
        self.get_json("/messages/unread-conversations").await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
