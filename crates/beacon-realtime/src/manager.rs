//! Push-channel lifecycle: connect, receive, flat-delay reconnect, stop.
//!
//! One spawned task owns the whole lifecycle of one logical channel. That
//! single ownership is what guarantees the contract: at most one live
//! channel and at most one pending retry timer exist per handle, and a
//! close event arriving after `stop()` cannot schedule anything because
//! the task is already gone.
//!
//! The retry delay is flat — no backoff growth, no attempt cap. The point
//! is bounded, predictable reconnection latency; the periodic polls keep
//! the system correct while the channel is down.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::connection::ConnectionState;
use crate::transport::PushTransport;

/// How one receive session ended.
enum ReceiveEnd {
    /// The subscriber stopped.
    Cancelled,
    /// The channel closed (server close, read error, sender dropped).
    Closed,
    /// No frame arrived within the idle window.
    IdleTimeout,
}

/// Drives one logical push channel on behalf of a subscriber.
pub struct ConnectionManager {
    transport: Arc<dyn PushTransport>,
    reconnect_delay: Duration,
    idle_timeout: Option<Duration>,
}

impl ConnectionManager {
    /// Create a manager over the given transport with a flat reconnect delay.
    #[must_use]
    pub fn new(transport: Arc<dyn PushTransport>, reconnect_delay: Duration) -> Self {
        Self {
            transport,
            reconnect_delay,
            idle_timeout: None,
        }
    }

    /// Force a reconnect when no frame arrives for `window` while open.
    #[must_use]
    pub fn with_idle_timeout(mut self, window: Duration) -> Self {
        self.idle_timeout = Some(window);
        self
    }

    /// Start the channel. Every inbound frame is forwarded verbatim to
    /// `on_frame`; classification is the caller's job.
    pub fn start<F>(&self, on_frame: F) -> ConnectionHandle
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let cancel = CancellationToken::new();
        let state = Arc::new(Mutex::new(ConnectionState::Idle));

        let task_cancel = cancel.clone();
        let task_state = state.clone();
        let transport = self.transport.clone();
        let reconnect_delay = self.reconnect_delay;
        let idle_timeout = self.idle_timeout;
        drop(tokio::spawn(async move {
            run_channel(
                transport,
                reconnect_delay,
                idle_timeout,
                task_cancel,
                task_state,
                on_frame,
            )
            .await;
        }));

        ConnectionHandle { cancel, state }
    }
}

/// Handle to one started channel. Stopping is idempotent, and dropping
/// the handle stops the channel too — a subscriber that unmounts without
/// calling [`stop`](Self::stop) must not leak a task.
pub struct ConnectionHandle {
    cancel: CancellationToken,
    state: Arc<Mutex<ConnectionState>>,
}

impl ConnectionHandle {
    /// Stop the channel: cancel any pending retry, close the connection,
    /// and transition to `Closed`. No reconnect can fire afterwards.
    pub fn stop(&self) {
        self.cancel.cancel();
        let mut state = self.state.lock();
        *state = state.on_stopped();
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn transition(
    state: &Mutex<ConnectionState>,
    apply: impl FnOnce(ConnectionState) -> ConnectionState,
) {
    let mut guard = state.lock();
    *guard = apply(*guard);
}

async fn run_channel<F>(
    transport: Arc<dyn PushTransport>,
    reconnect_delay: Duration,
    idle_timeout: Option<Duration>,
    cancel: CancellationToken,
    state: Arc<Mutex<ConnectionState>>,
    on_frame: F,
) where
    F: Fn(String) + Send + Sync + 'static,
{
    loop {
        transition(&state, ConnectionState::on_connect_started);

        let connected = tokio::select! {
            () = cancel.cancelled() => break,
            result = transport.connect() => result,
        };

        match connected {
            Ok(rx) => {
                transition(&state, ConnectionState::on_opened);
                debug!("push channel open");
                match receive_frames(rx, &cancel, idle_timeout, &on_frame).await {
                    ReceiveEnd::Cancelled => break,
                    ReceiveEnd::Closed => debug!("push channel closed"),
                    ReceiveEnd::IdleTimeout => warn!("push channel idle, forcing reconnect"),
                }
            }
            Err(error) => {
                warn!(%error, "push channel connect failed");
            }
        }

        if cancel.is_cancelled() {
            break;
        }
        transition(&state, ConnectionState::on_lost);
        debug!(?reconnect_delay, "reconnect scheduled");

        tokio::select! {
            () = cancel.cancelled() => break,
            () = time::sleep(reconnect_delay) => {}
        }
    }

    transition(&state, ConnectionState::on_stopped);
}

async fn receive_frames<F>(
    mut rx: mpsc::Receiver<String>,
    cancel: &CancellationToken,
    idle_timeout: Option<Duration>,
    on_frame: &F,
) -> ReceiveEnd
where
    F: Fn(String) + Send + Sync + 'static,
{
    loop {
        match idle_timeout {
            Some(window) => tokio::select! {
                () = cancel.cancelled() => return ReceiveEnd::Cancelled,
                result = time::timeout(window, rx.recv()) => match result {
                    Ok(Some(frame)) => on_frame(frame),
                    Ok(None) => return ReceiveEnd::Closed,
                    Err(_) => return ReceiveEnd::IdleTimeout,
                },
            },
            None => tokio::select! {
                () = cancel.cancelled() => return ReceiveEnd::Cancelled,
                frame = rx.recv() => match frame {
                    Some(frame) => on_frame(frame),
                    None => return ReceiveEnd::Closed,
                },
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport whose connections are plain mpsc channels the test holds
    /// the sending half of.
    struct ScriptedTransport {
        attempts: AtomicUsize,
        senders: Mutex<Vec<mpsc::Sender<String>>>,
    }

    impl ScriptedTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                attempts: AtomicUsize::new(0),
                senders: Mutex::new(Vec::new()),
            })
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        fn sender(&self, attempt: usize) -> mpsc::Sender<String> {
            self.senders.lock()[attempt].clone()
        }

        fn drop_sender(&self, attempt: usize) {
            // Replacing with a closed sender drops the held one.
            let (closed, _) = mpsc::channel(1);
            self.senders.lock()[attempt] = closed;
        }
    }

    #[async_trait]
    impl PushTransport for ScriptedTransport {
        async fn connect(&self) -> Result<mpsc::Receiver<String>, TransportError> {
            let _ = self.attempts.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = mpsc::channel(16);
            self.senders.lock().push(tx);
            Ok(rx)
        }
    }

    /// Let the spawned manager task run to its next await point.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    const DELAY: Duration = Duration::from_millis(5_000);

    #[tokio::test(start_paused = true)]
    async fn start_opens_exactly_one_channel() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let handle = manager.start(|_| {});
        settle().await;

        assert_eq!(transport.attempts(), 1);
        assert_eq!(handle.state(), ConnectionState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn frames_are_forwarded_verbatim() {
        let transport = ScriptedTransport::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();

        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let _handle = manager.start(move |frame| sink.lock().push(frame));
        settle().await;

        transport.sender(0).send("{\"type\":\"general\"}".into()).await.unwrap();
        transport.sender(0).send("not even json".into()).await.unwrap();
        settle().await;

        let frames = received.lock().clone();
        assert_eq!(frames, vec!["{\"type\":\"general\"}", "not even json"]);
    }

    #[tokio::test(start_paused = true)]
    async fn close_schedules_exactly_one_retry_after_the_flat_delay() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let handle = manager.start(|_| {});
        settle().await;
        assert_eq!(transport.attempts(), 1);

        // Lose the channel; the manager should notice and schedule.
        transport.drop_sender(0);
        settle().await;
        assert_eq!(handle.state(), ConnectionState::Reconnecting);

        // Just before the delay elapses: still exactly one attempt.
        time::sleep(Duration::from_millis(4_999)).await;
        assert_eq!(transport.attempts(), 1);

        // Past the delay: exactly one new attempt, channel open again.
        time::sleep(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(transport.attempts(), 2);
        assert_eq!(handle.state(), ConnectionState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_indefinitely_with_flat_spacing() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let _handle = manager.start(|_| {});
        settle().await;

        for round in 0..4 {
            transport.drop_sender(round);
            settle().await;
            time::sleep(DELAY + Duration::from_millis(1)).await;
            settle().await;
            assert_eq!(transport.attempts(), round + 2, "round {round}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_the_pending_retry() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let handle = manager.start(|_| {});
        settle().await;

        transport.drop_sender(0);
        settle().await;
        assert_eq!(handle.state(), ConnectionState::Reconnecting);

        handle.stop();
        settle().await;
        assert_eq!(handle.state(), ConnectionState::Closed);

        // Well past the delay: no further attempt fires.
        time::sleep(DELAY * 3).await;
        settle().await;
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn close_after_stop_schedules_nothing() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let handle = manager.start(|_| {});
        settle().await;

        handle.stop();
        settle().await;
        assert_eq!(handle.state(), ConnectionState::Closed);

        // The close event arrives late, after stop.
        transport.drop_sender(0);
        time::sleep(DELAY * 2).await;
        settle().await;
        assert_eq!(transport.attempts(), 1);
        assert_eq!(handle.state(), ConnectionState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let handle = manager.start(|_| {});
        settle().await;

        handle.stop();
        handle.stop();
        assert_eq!(handle.state(), ConnectionState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_channel() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let handle = manager.start(|_| {});
        settle().await;
        drop(handle);

        transport.drop_sender(0);
        time::sleep(DELAY * 2).await;
        settle().await;
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_timeout_forces_a_reconnect() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY)
            .with_idle_timeout(Duration::from_millis(30_000));
        let handle = manager.start(|_| {});
        settle().await;
        assert_eq!(transport.attempts(), 1);

        // Silence for the whole window, then the flat delay.
        time::sleep(Duration::from_millis(30_001)).await;
        settle().await;
        assert_eq!(handle.state(), ConnectionState::Reconnecting);
        time::sleep(DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn frames_reset_the_idle_window() {
        let transport = ScriptedTransport::new();
        let manager = ConnectionManager::new(transport.clone(), DELAY)
            .with_idle_timeout(Duration::from_millis(30_000));
        let _handle = manager.start(|_| {});
        settle().await;

        // A frame three-quarters of the way through the window keeps the
        // channel alive past the original deadline.
        time::sleep(Duration::from_millis(22_500)).await;
        transport.sender(0).send("{}".into()).await.unwrap();
        settle().await;
        time::sleep(Duration::from_millis(22_500)).await;
        settle().await;
        assert_eq!(transport.attempts(), 1);
    }

    /// Transport that always fails to connect.
    struct RefusingTransport {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl PushTransport for RefusingTransport {
        async fn connect(&self) -> Result<mpsc::Receiver<String>, TransportError> {
            let _ = self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Connect {
                url: "ws://test".into(),
                message: "refused".into(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_connects_keep_retrying_on_the_flat_delay() {
        let transport = Arc::new(RefusingTransport {
            attempts: AtomicUsize::new(0),
        });
        let manager = ConnectionManager::new(transport.clone(), DELAY);
        let handle = manager.start(|_| {});
        settle().await;
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), ConnectionState::Reconnecting);

        time::sleep(DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 2);
    }
}
