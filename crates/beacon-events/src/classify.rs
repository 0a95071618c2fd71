//! Wire-shape normalization.
//!
//! The push channel has carried two shapes for the same logical event over
//! its lifetime:
//!
//! ```json
//! { "type": "notification", "data": { "type": "campaign_invite", ... } }
//! { "type": "campaign_invite", ... }
//! ```
//!
//! plus out-of-band structural frames such as
//! `{ "type": "deliverable:created", "campaignId": 1, ... }`. All three are
//! normalized into one [`EventEnvelope`] here. Anything else — unparseable
//! JSON, a missing `type`, an unrecognized kind — yields `None`; the caller
//! drops the frame and the connection stays open.

use serde_json::Value;
use tracing::debug;

use crate::envelope::EventEnvelope;
use crate::kind::EventKind;

/// Classify a raw inbound frame into an [`EventEnvelope`].
///
/// Returns `None` for anything that cannot be normalized. Never panics and
/// never propagates an error: a malformed frame must not take down the
/// channel.
#[must_use]
pub fn classify(raw: &str) -> Option<EventEnvelope> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(error) => {
            debug!(%error, "dropping unparseable frame");
            return None;
        }
    };

    let Some(type_str) = value.get("type").and_then(Value::as_str) else {
        debug!("dropping frame without a type field");
        return None;
    };

    // Nested shape: the kind lives in data.type and the payload is data.
    if type_str == "notification" {
        let Some(data) = value.get("data") else {
            debug!("dropping notification frame without data");
            return None;
        };
        let Some(kind_str) = data.get("type").and_then(Value::as_str) else {
            debug!("dropping notification frame without data.type");
            return None;
        };
        return match kind_str.parse::<EventKind>() {
            Ok(kind) => Some(EventEnvelope::new(kind, data.clone())),
            Err(_) => {
                debug!(kind = kind_str, "dropping frame with unrecognized kind");
                None
            }
        };
    }

    // Flat shape: the kind is the top-level type and the frame is the payload.
    match type_str.parse::<EventKind>() {
        Ok(kind) => Some(EventEnvelope::new(kind, value)),
        Err(_) => {
            debug!(kind = type_str, "dropping frame with unrecognized kind");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
