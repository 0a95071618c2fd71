//! The connection lifecycle state machine, as pure data.
//!
//! Transitions are plain functions so the reconnect contract is testable
//! without sockets or timers; [`ConnectionManager`](crate::ConnectionManager)
//! drives them from its task. `Closed` is terminal: once a subscriber
//! stops, nothing revives the handle.

/// Lifecycle state of one logical push channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, not yet started.
    Idle,
    /// A connect attempt is in flight.
    Connecting,
    /// The channel is live and delivering frames.
    Open,
    /// The channel was lost; a retry is scheduled.
    Reconnecting,
    /// Explicitly stopped. Terminal.
    Closed,
}

impl ConnectionState {
    /// A connect attempt begins (initial start or retry firing).
    #[must_use]
    pub fn on_connect_started(self) -> Self {
        match self {
            Self::Idle | Self::Reconnecting | Self::Connecting => Self::Connecting,
            Self::Open => Self::Open,
            Self::Closed => Self::Closed,
        }
    }

    /// The channel opened successfully.
    #[must_use]
    pub fn on_opened(self) -> Self {
        match self {
            Self::Connecting => Self::Open,
            other => other,
        }
    }

    /// The channel closed or errored while a subscriber is active.
    #[must_use]
    pub fn on_lost(self) -> Self {
        match self {
            Self::Open | Self::Connecting => Self::Reconnecting,
            other => other,
        }
    }

    /// The subscriber stopped. Terminal from every state.
    #[must_use]
    pub fn on_stopped(self) -> Self {
        Self::Closed
    }

    /// Whether this state can ever deliver frames again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}
