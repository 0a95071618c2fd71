//! Waveform synthesis for the alert cue.
//!
//! The cue is two sequential sine tones, each with an exponential decay
//! envelope, rendered as mono f32 PCM. Rendering is pure: same spec, same
//! samples.

use std::f32::consts::TAU;

/// Parameters of the synthesized cue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CueSpec {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Total cue length in milliseconds.
    pub duration_ms: u32,
    /// Frequency of the first tone in Hz.
    pub first_tone_hz: f32,
    /// Frequency of the second tone in Hz.
    pub second_tone_hz: f32,
    /// Linear peak gain, `0.0..=1.0`.
    pub gain: f32,
}

impl Default for CueSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            duration_ms: 250,
            // A5 then E6 — a rising fifth reads as "something arrived"
            // without sounding like an alarm.
            first_tone_hz: 880.0,
            second_tone_hz: 1318.5,
            gain: 0.3,
        }
    }
}

impl CueSpec {
    /// Default spec with the gain replaced.
    ///
    /// Gain is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_gain(gain: f32) -> Self {
        Self {
            gain: gain.clamp(0.0, 1.0),
            ..Self::default()
        }
    }
}

/// Rendered mono PCM, cached for the lifetime of an
/// [`AudioCue`](crate::AudioCue).
#[derive(Clone, Debug, PartialEq)]
pub struct CueBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl CueBuffer {
    /// The rendered samples.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate the buffer was rendered at.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Decay rate of each tone's envelope. Chosen so a tone has faded to
/// under 1% of its peak by the end of its segment.
const ENVELOPE_DECAY: f32 = 5.0;

/// Render the cue described by `spec`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn synthesize(spec: &CueSpec) -> CueBuffer {
    let total = (u64::from(spec.sample_rate) * u64::from(spec.duration_ms) / 1000) as usize;
    let half = total / 2;
    let rate = spec.sample_rate as f32;

    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let (freq, segment_start, segment_len) = if i < half {
            (spec.first_tone_hz, 0, half)
        } else {
            (spec.second_tone_hz, half, total - half)
        };
        let t = i as f32 / rate;
        let progress = (i - segment_start) as f32 / segment_len.max(1) as f32;
        let envelope = (-ENVELOPE_DECAY * progress).exp();
        samples.push((TAU * freq * t).sin() * envelope * spec.gain);
    }

    CueBuffer {
        samples,
        sample_rate: spec.sample_rate,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
