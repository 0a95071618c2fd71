//! # beacon-settings
//!
//! Configuration management with layered sources for the Beacon realtime
//! layer.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`BeaconSettings::default()`]
//! 2. **User file** — `~/.beacon/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `BEACON_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use beacon_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("reconnect delay: {} ms", settings.realtime.reconnect_delay_ms);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton.
///
/// Initialized on first access via [`get_settings`]. Falls back to
/// compiled defaults if loading fails.
static SETTINGS: OnceLock<BeaconSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.beacon/settings.json` with env
/// var overrides. On subsequent calls, returns the cached value. If
/// loading fails, returns compiled defaults.
pub fn get_settings() -> &'static BeaconSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already
/// initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: BeaconSettings) -> std::result::Result<(), BeaconSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
