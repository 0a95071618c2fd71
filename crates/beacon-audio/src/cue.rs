//! The cached cue and its playback seam.

use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::synth::{CueBuffer, CueSpec, synthesize};

/// Playback failure. Callers are expected to swallow this — a missed
/// alert tone must never affect the notification itself.
#[derive(Debug, Error)]
pub enum AudioError {
    /// `play()` was called before `init()`.
    #[error("audio cue has not been initialized")]
    Uninitialized,
    /// The sink refused or failed playback.
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// Playback output seam.
///
/// The host application supplies the real device-backed implementation;
/// this crate ships only [`NullSink`] so the cue can be exercised (and
/// degraded to silence) without an audio device.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play the rendered buffer to completion.
    async fn play(&self, buffer: &CueBuffer) -> Result<(), AudioError>;
}

/// Sink that accepts playback and emits nothing.
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, _buffer: &CueBuffer) -> Result<(), AudioError> {
        Ok(())
    }
}

/// The alert cue: render-once, play-many.
///
/// One instance per provider; the buffer is rendered on the first `init()`
/// and every later `init()` is a no-op, so remounting a subscriber never
/// re-synthesizes.
pub struct AudioCue {
    spec: CueSpec,
    sink: Arc<dyn AudioSink>,
    buffer: OnceLock<CueBuffer>,
}

impl AudioCue {
    /// Create a cue that renders with `spec` and plays through `sink`.
    #[must_use]
    pub fn new(spec: CueSpec, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            spec,
            sink,
            buffer: OnceLock::new(),
        }
    }

    /// Render and cache the buffer. Idempotent; never fails.
    pub fn init(&self) {
        let _ = self.buffer.get_or_init(|| {
            debug!(
                sample_rate = self.spec.sample_rate,
                duration_ms = self.spec.duration_ms,
                "rendering alert cue"
            );
            synthesize(&self.spec)
        });
    }

    /// Whether `init()` has rendered the buffer.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.buffer.get().is_some()
    }

    /// Play the cached cue.
    ///
    /// Never panics. Any failure — uninitialized cue, sink rejection —
    /// comes back as an [`AudioError`] the caller is expected to ignore.
    pub async fn play(&self) -> Result<(), AudioError> {
        let Some(buffer) = self.buffer.get() else {
            return Err(AudioError::Uninitialized);
        };
        self.sink.play(buffer).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        plays: AtomicUsize,
        last_len: AtomicUsize,
    }

    impl CountingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                plays: AtomicUsize::new(0),
                last_len: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AudioSink for CountingSink {
        async fn play(&self, buffer: &CueBuffer) -> Result<(), AudioError> {
            let _ = self.plays.fetch_add(1, Ordering::Relaxed);
            self.last_len.store(buffer.len(), Ordering::Relaxed);
            Ok(())
        }
    }

    struct RejectingSink;

    #[async_trait]
    impl AudioSink for RejectingSink {
        async fn play(&self, _buffer: &CueBuffer) -> Result<(), AudioError> {
            Err(AudioError::Rejected("autoplay policy".into()))
        }
    }

    #[tokio::test]
    async fn play_before_init_is_an_error_not_a_panic() {
        let cue = AudioCue::new(CueSpec::default(), Arc::new(NullSink));
        let err = cue.play().await.unwrap_err();
        assert!(matches!(err, AudioError::Uninitialized));
    }

    #[tokio::test]
    async fn init_then_play_reaches_the_sink() {
        let sink = CountingSink::new();
        let cue = AudioCue::new(CueSpec::default(), sink.clone());
        cue.init();
        cue.play().await.unwrap();
        assert_eq!(sink.plays.load(Ordering::Relaxed), 1);
        assert_eq!(sink.last_len.load(Ordering::Relaxed), 11_025);
    }

    #[test]
    fn init_is_idempotent() {
        let cue = AudioCue::new(CueSpec::default(), Arc::new(NullSink));
        assert!(!cue.is_initialized());
        cue.init();
        assert!(cue.is_initialized());
        // Second init must not re-render or panic.
        cue.init();
        assert!(cue.is_initialized());
    }

    #[tokio::test]
    async fn rejecting_sink_surfaces_a_swallowable_error() {
        let cue = AudioCue::new(CueSpec::default(), Arc::new(RejectingSink));
        cue.init();
        let err = cue.play().await.unwrap_err();
        assert!(matches!(err, AudioError::Rejected(_)));
        assert!(err.to_string().contains("autoplay policy"));
    }

    #[tokio::test]
    async fn repeated_plays_reuse_the_cached_buffer() {
        let sink = CountingSink::new();
        let cue = AudioCue::new(CueSpec::default(), sink.clone());
        cue.init();
        for _ in 0..3 {
            cue.play().await.unwrap();
        }
        assert_eq!(sink.plays.load(Ordering::Relaxed), 3);
    }
}
