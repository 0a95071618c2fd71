//! # beacon-realtime
//!
//! The realtime event delivery and notification-reconciliation layer:
//!
//! - **Connection**: [`ConnectionManager`] / [`ConnectionHandle`] — one
//!   task per logical push channel, flat-delay reconnect, idempotent stop;
//!   [`ConnectionState`] is the lifecycle machine as pure data
//! - **Transport**: [`PushTransport`] seam with the
//!   [`WebSocketTransport`] production implementation
//! - **Aggregation**: [`NotificationAggregator`] — pushed items merged
//!   with authoritative poll snapshots into one deduplicated unread model
//! - **Badges**: [`BadgeState`] — independent per-[`Surface`] counters
//!   with a computed total
//! - **Provider**: [`NotificationCenter`] — the injected service object
//!   that owns all of the above for exactly one subscriber context
//!
//! Nothing in this crate is fatal to the host: transport faults reconnect,
//! malformed frames drop, fetch failures keep last-known state, and the
//! worst case is "realtime stops, polling keeps everything correct".

#![deny(unsafe_code)]

pub mod aggregator;
pub mod badge;
pub mod center;
pub mod connection;
pub mod manager;
pub mod transport;

pub use aggregator::{NotificationAggregator, PollSnapshot};
pub use badge::{ALL_SURFACES, BadgeState, Surface};
pub use center::{NotificationCenter, QueryCache};
pub use connection::ConnectionState;
pub use manager::{ConnectionHandle, ConnectionManager};
pub use transport::{PushTransport, TransportError, WebSocketTransport};
