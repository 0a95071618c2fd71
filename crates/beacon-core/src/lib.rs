//! # beacon-core
//!
//! Foundation types and shared vocabulary for the Beacon realtime layer.
//!
//! This crate provides what every other Beacon crate depends on:
//!
//! - **Kinds**: [`NotificationKind`] — the notification category discriminators
//!   with their exact wire strings and surface-ownership rules
//! - **Models**: [`StoredNotification`], [`PendingInvite`] (server-owned,
//!   polled) and [`UnifiedNotificationItem`] (client-only view model)
//! - **IDs**: [`UnifiedId`] — the synthetic namespaced id that keys the
//!   unified feed (`"notification-42"` / `"invite-7"`)
//! - **Constants**: default timing values shared across crates

#![deny(unsafe_code)]

pub mod constants;
pub mod ids;
pub mod kinds;
pub mod model;

pub use ids::UnifiedId;
pub use kinds::{ALL_NOTIFICATION_KINDS, NotificationKind};
pub use model::{PendingInvite, StoredNotification, UnifiedNotificationItem};
