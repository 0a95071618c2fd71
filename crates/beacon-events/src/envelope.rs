//! The normalized representation of one inbound realtime event.

use serde_json::Value;

use crate::kind::EventKind;

/// Correlation ids extracted from an event payload.
///
/// Used by the invalidation policy to parameterize cache keys. Absent
/// fields simply mean the event did not carry that id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrelationIds {
    /// Campaign the event relates to.
    pub campaign_id: Option<i64>,
    /// Application the event relates to.
    pub application_id: Option<i64>,
    /// Deliverable the event relates to.
    pub deliverable_id: Option<i64>,
}

impl CorrelationIds {
    /// Extract correlation ids from a payload object.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            campaign_id: payload.get("campaignId").and_then(Value::as_i64),
            application_id: payload.get("applicationId").and_then(Value::as_i64),
            deliverable_id: payload.get("deliverableId").and_then(Value::as_i64),
        }
    }
}

/// One classified inbound event.
///
/// Transient: exists only for the duration of a single dispatch cycle.
/// The `payload` keeps the source object so handlers can read fields the
/// envelope does not model.
#[derive(Clone, Debug, PartialEq)]
pub struct EventEnvelope {
    /// Normalized event kind.
    pub kind: EventKind,
    /// Ids extracted for cache-key parameterization.
    pub correlation: CorrelationIds,
    /// The payload object the kind was read from.
    pub payload: Value,
}

impl EventEnvelope {
    /// Build an envelope, extracting correlation ids from the payload.
    #[must_use]
    pub fn new(kind: EventKind, payload: Value) -> Self {
        let correlation = CorrelationIds::from_payload(&payload);
        Self {
            kind,
            correlation,
            payload,
        }
    }
}
