//! The provider that owns the realtime subsystem for one subscriber.
//!
//! A [`NotificationCenter`] is created when a subscriber mounts and torn
//! down when it unmounts. It owns every resource of the subsystem — the
//! push channel, the aggregator, the badge counters, the audio cue, the
//! poll loops — so nothing lives at module scope and nothing outlives its
//! subscriber.
//!
//! Frame path: transport → [`classify`] → three independent handlers
//! (cache invalidation, feed aggregation, audio cue). Poll path: interval
//! loops that replace the aggregator's per-source snapshots and refresh
//! the badge counters. Results of fetches that complete after teardown
//! are discarded by a generation token.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use beacon_api::MarketplaceApi;
use beacon_audio::{AudioCue, AudioSink, CueSpec};
use beacon_core::{NotificationKind, StoredNotification, UnifiedId, UnifiedNotificationItem};
use beacon_events::{
    CacheKey, EventEnvelope, EventHandler, EventKind, HandlerError, classify, dispatch, keys_for,
};
use beacon_settings::BeaconSettings;

use crate::aggregator::{NotificationAggregator, PollSnapshot};
use crate::badge::{ALL_SURFACES, BadgeState, Surface};
use crate::connection::ConnectionState;
use crate::manager::{ConnectionHandle, ConnectionManager};
use crate::transport::PushTransport;

/// Sink for targeted cache invalidation.
///
/// The host application's query cache implements this; each named key is
/// a query whose next read should refetch.
pub trait QueryCache: Send + Sync {
    /// Mark one cached query stale.
    fn invalidate(&self, key: &CacheKey);
}

/// State shared between the frame path, the poll loops, and the reads.
struct Shared {
    aggregator: Mutex<NotificationAggregator>,
    badges: BadgeState,
    audio: AudioCue,
    audio_enabled: bool,
    api: Arc<dyn MarketplaceApi>,
    cache: Arc<dyn QueryCache>,
    /// Bumped on teardown; async results carrying an older value are
    /// discarded instead of applied to torn-down state.
    generation: AtomicU64,
}

impl Shared {
    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    fn bump_generation(&self) {
        let _ = self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// The injected service object owning one subscriber's realtime state.
pub struct NotificationCenter {
    shared: Arc<Shared>,
    connection: ConnectionHandle,
    polls: CancellationToken,
}

impl NotificationCenter {
    /// Mount the subsystem: open the push channel, start the poll loops,
    /// render the audio cue. Must be called from within a tokio runtime.
    #[allow(clippy::cast_possible_truncation)]
    pub fn subscribe(
        settings: &BeaconSettings,
        transport: Arc<dyn PushTransport>,
        api: Arc<dyn MarketplaceApi>,
        cache: Arc<dyn QueryCache>,
        sink: Arc<dyn AudioSink>,
    ) -> Self {
        let audio = AudioCue::new(CueSpec::with_gain(settings.audio.volume as f32), sink);
        audio.init();

        let shared = Arc::new(Shared {
            aggregator: Mutex::new(NotificationAggregator::new()),
            badges: BadgeState::new(),
            audio,
            audio_enabled: settings.audio.enabled,
            api,
            cache,
            generation: AtomicU64::new(0),
        });

        let mut manager = ConnectionManager::new(
            transport,
            Duration::from_millis(settings.realtime.reconnect_delay_ms),
        );
        if let Some(window) = settings.realtime.idle_timeout_ms {
            manager = manager.with_idle_timeout(Duration::from_millis(window));
        }
        let frame_shared = shared.clone();
        let connection = manager.start(move |frame| on_frame(&frame_shared, &frame));

        let polls = CancellationToken::new();
        spawn_feed_poll(
            shared.clone(),
            settings.polling.feed_interval_ms,
            settings.api.notifications_limit,
            polls.clone(),
        );
        spawn_badge_poll(shared.clone(), settings.polling.badge_interval_ms, polls.clone());

        Self {
            shared,
            connection,
            polls,
        }
    }

    /// The unified feed, newest first.
    #[must_use]
    pub fn feed(&self) -> Vec<UnifiedNotificationItem> {
        self.shared.aggregator.lock().feed()
    }

    /// Unread stored notifications plus pending invites.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.shared.aggregator.lock().unread_count()
    }

    /// Current badge count for one surface.
    #[must_use]
    pub fn badge(&self, surface: Surface) -> u64 {
        self.shared.badges.count(surface)
    }

    /// The combined badge across every surface, recomputed on read.
    #[must_use]
    pub fn total_badge(&self) -> u64 {
        self.shared.badges.total()
    }

    /// Current push-channel lifecycle state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Mark one stored notification read: locally at once, then on the
    /// server. A failed server call leaves the optimistic local state for
    /// the next poll to reconcile.
    pub async fn mark_read(&self, id: i64) -> Result<(), beacon_api::ApiError> {
        self.shared
            .aggregator
            .lock()
            .mark_read(&UnifiedId::notification(id));
        self.shared.api.mark_read(id).await
    }

    /// Mark every stored notification read, locally and on the server.
    pub async fn mark_all_read(&self) -> Result<(), beacon_api::ApiError> {
        self.shared.aggregator.lock().mark_all_read();
        self.shared.api.mark_all_read().await
    }

    /// Unmount: cancel the poll loops and any pending reconnect, close
    /// the channel, and invalidate in-flight fetches. Idempotent; also
    /// runs on drop.
    pub fn unsubscribe(&self) {
        self.shared.bump_generation();
        self.polls.cancel();
        self.connection.stop();
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame path
// ─────────────────────────────────────────────────────────────────────────────

fn on_frame(shared: &Arc<Shared>, raw: &str) {
    let Some(envelope) = classify(raw) else {
        return;
    };
    let invalidation = InvalidationHandler { shared };
    let feed = FeedHandler { shared };
    let cue = CueHandler { shared };
    let handlers: [&dyn EventHandler; 3] = [&invalidation, &feed, &cue];
    let _ = dispatch(&envelope, &handlers);
}

/// Applies the invalidation table and kicks badge refreshes for any key
/// that names a surface's count query.
struct InvalidationHandler<'a> {
    shared: &'a Arc<Shared>,
}

impl EventHandler for InvalidationHandler<'_> {
    fn name(&self) -> &str {
        "invalidation"
    }

    fn matches(&self, _kind: EventKind) -> bool {
        true
    }

    fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        for key in keys_for(envelope) {
            self.shared.cache.invalidate(&key);
            if let Some(surface) = Surface::for_key(&key) {
                refresh_badge(self.shared.clone(), surface);
            }
        }
        Ok(())
    }
}

/// Optimistically appends pushed notifications to the unified feed.
struct FeedHandler<'a> {
    shared: &'a Arc<Shared>,
}

impl EventHandler for FeedHandler<'_> {
    fn name(&self) -> &str {
        "feed"
    }

    fn matches(&self, kind: EventKind) -> bool {
        kind.notification().is_some_and(|k| !k.is_surface_owned())
    }

    fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError> {
        let Some(kind) = envelope.kind.notification() else {
            return Ok(());
        };
        let Some(notification) = pushed_notification(&envelope.payload, kind) else {
            return Err("push payload has no usable id".into());
        };
        let _ = self.shared.aggregator.lock().ingest_push(&notification);
        Ok(())
    }
}

/// Plays the alert tone for notification-carried events. Failures are
/// swallowed — the notification itself must never depend on the sound.
struct CueHandler<'a> {
    shared: &'a Arc<Shared>,
}

impl EventHandler for CueHandler<'_> {
    fn name(&self) -> &str {
        "cue"
    }

    fn matches(&self, kind: EventKind) -> bool {
        kind.notification().is_some()
    }

    fn handle(&self, _envelope: &EventEnvelope) -> Result<(), HandlerError> {
        if !self.shared.audio_enabled {
            return Ok(());
        }
        let shared = self.shared.clone();
        drop(tokio::spawn(async move {
            if let Err(error) = shared.audio.play().await {
                debug!(%error, "alert tone skipped");
            }
        }));
        Ok(())
    }
}

/// Rebuild a [`StoredNotification`] from a push payload.
///
/// Push payloads carry the kind in `type` and have no read state; a
/// missing timestamp falls back to "now" so the optimistic item sorts to
/// the top of the feed.
fn pushed_notification(payload: &Value, kind: NotificationKind) -> Option<StoredNotification> {
    let id = payload.get("id").and_then(Value::as_i64)?;
    let text = |field: &str| {
        payload
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let created_at = payload
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    Some(StoredNotification {
        id,
        kind,
        title: text("title"),
        message: text("message"),
        action_url: payload
            .get("actionUrl")
            .and_then(Value::as_str)
            .map(str::to_owned),
        is_read: payload
            .get("isRead")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Poll path
// ─────────────────────────────────────────────────────────────────────────────

/// Fetch one surface's count and apply it unless the provider was torn
/// down while the request was in flight.
fn refresh_badge(shared: Arc<Shared>, surface: Surface) {
    let generation = shared.generation();
    drop(tokio::spawn(async move {
        let fetched = match surface {
            Surface::Notifications => shared.api.unread_count().await,
            Surface::Invites => shared.api.invite_count().await,
            Surface::Messages => shared.api.unread_message_count().await,
        };
        match fetched {
            Ok(count) if shared.is_current(generation) => shared.badges.set(surface, count),
            Ok(_) => debug!(?surface, "discarding stale badge response"),
            Err(error) => {
                debug!(?surface, %error, "badge refresh failed, keeping last value");
            }
        }
    }));
}

fn spawn_feed_poll(
    shared: Arc<Shared>,
    interval_ms: u64,
    limit: usize,
    cancel: CancellationToken,
) {
    drop(tokio::spawn(async move {
        let mut ticker = time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let generation = shared.generation();
                    match shared.api.notifications(limit).await {
                        Ok(items) if shared.is_current(generation) => {
                            shared.aggregator.lock().ingest_poll(PollSnapshot::Stored(&items));
                        }
                        Ok(_) => debug!("discarding stale notifications poll"),
                        Err(error) => {
                            debug!(%error, "notifications poll failed, keeping last snapshot");
                        }
                    }

                    let generation = shared.generation();
                    match shared.api.pending_invites().await {
                        Ok(invites) if shared.is_current(generation) => {
                            shared.aggregator.lock().ingest_poll(PollSnapshot::Pending(&invites));
                        }
                        Ok(_) => debug!("discarding stale invites poll"),
                        Err(error) => {
                            debug!(%error, "invites poll failed, keeping last snapshot");
                        }
                    }
                }
            }
        }
    }));
}

fn spawn_badge_poll(shared: Arc<Shared>, interval_ms: u64, cancel: CancellationToken) {
    drop(tokio::spawn(async move {
        let mut ticker = time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    for surface in ALL_SURFACES {
                        refresh_badge(shared.clone(), surface);
                    }
                }
            }
        }
    }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
