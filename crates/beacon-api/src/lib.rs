//! # beacon-api
//!
//! Typed REST client for the marketplace collaborator endpoints the
//! realtime layer polls and mutates:
//!
//! - `GET /notifications?limit=N`, `GET /notifications/unread-count`
//! - `PATCH /notifications/{id}/read`, `PATCH /notifications/read-all`
//! - `GET /invites/pending`, `GET /invites/count`
//! - `GET /messages/unread-count`, `GET /messages/unread-conversations`
//!
//! [`MarketplaceApi`] is the seam the rest of the system depends on;
//! [`HttpMarketplaceApi`] is the `reqwest` implementation. The client
//! reports failures faithfully — the safe-default policy (empty
//! collection, zero count) belongs to the call sites, not here.

#![deny(unsafe_code)]

pub mod client;
pub mod error;

pub use client::{ConversationSummary, HttpMarketplaceApi, MarketplaceApi};
pub use error::ApiError;
