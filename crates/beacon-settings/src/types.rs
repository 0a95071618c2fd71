//! The settings tree.
//!
//! Every field has a compiled default matching the reference behavior of
//! the subsystem: a flat 5 s reconnect delay, 30 s badge polls, a 20-item
//! notification page. Wire names are camelCase so the settings file reads
//! like the rest of the API surface.

use serde::{Deserialize, Serialize};

use beacon_core::constants::{
    DEFAULT_API_TIMEOUT_MS, DEFAULT_BADGE_REFRESH_MS, DEFAULT_FEED_REFRESH_MS,
    DEFAULT_NOTIFICATIONS_LIMIT, DEFAULT_RECONNECT_DELAY_MS,
};

/// Root settings object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeaconSettings {
    /// Settings schema version.
    pub version: String,
    /// Push-channel settings.
    pub realtime: RealtimeSettings,
    /// REST collaborator settings.
    pub api: ApiSettings,
    /// Poll cadence settings.
    pub polling: PollingSettings,
    /// Audio cue settings.
    pub audio: AudioSettings,
}

impl Default for BeaconSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_owned(),
            realtime: RealtimeSettings::default(),
            api: ApiSettings::default(),
            polling: PollingSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

/// Push-channel settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeSettings {
    /// WebSocket endpoint for the notification channel.
    pub url: String,
    /// Flat delay between reconnect attempts, in milliseconds.
    ///
    /// Intentionally flat: no backoff growth, so reconnection latency
    /// stays bounded.
    pub reconnect_delay_ms: u64,
    /// Force a reconnect when no frame arrives for this long while open.
    /// `None` disables the watchdog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_ms: Option<u64>,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            url: "wss://api.beacon.app/realtime/notifications".to_owned(),
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            idle_timeout_ms: None,
        }
    }
}

/// REST collaborator settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL the collaborator endpoints hang off.
    pub base_url: String,
    /// Per-request timeout, in milliseconds.
    pub timeout_ms: u64,
    /// Page size for the stored-notification poll.
    pub notifications_limit: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.beacon.app".to_owned(),
            timeout_ms: DEFAULT_API_TIMEOUT_MS,
            notifications_limit: DEFAULT_NOTIFICATIONS_LIMIT,
        }
    }
}

/// Poll cadence settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollingSettings {
    /// Interval between badge-count refetches, in milliseconds.
    pub badge_interval_ms: u64,
    /// Interval between full feed refetches, in milliseconds.
    pub feed_interval_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            badge_interval_ms: DEFAULT_BADGE_REFRESH_MS,
            feed_interval_ms: DEFAULT_FEED_REFRESH_MS,
        }
    }
}

/// Audio cue settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    /// Whether the alert tone plays at all.
    pub enabled: bool,
    /// Linear gain applied to the synthesized cue, `0.0..=1.0`.
    pub volume: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
