//! # beacon-events
//!
//! Inbound-event plumbing for the Beacon realtime layer:
//!
//! - **Kinds**: [`EventKind`] — discriminated union of notification-carried
//!   kinds and out-of-band [`StructuralKind`]s, with exact wire strings
//! - **Classification**: [`classify`] — normalizes both historical wire
//!   shapes into one [`EventEnvelope`], dropping malformed frames silently
//! - **Dispatch**: [`dispatch`] — fan-out to matching handlers with
//!   per-handler failure isolation
//! - **Invalidation**: [`keys_for`] — the pure kind → [`CacheKey`] table

#![deny(unsafe_code)]

pub mod classify;
pub mod dispatch;
pub mod envelope;
pub mod invalidation;
pub mod kind;

pub use classify::classify;
pub use dispatch::{EventHandler, HandlerError, dispatch};
pub use envelope::{CorrelationIds, EventEnvelope};
pub use invalidation::{CacheKey, keys_for};
pub use kind::{ALL_STRUCTURAL_KINDS, EventKind, StructuralKind};
