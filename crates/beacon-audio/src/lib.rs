//! # beacon-audio
//!
//! The notification alert tone, generated procedurally — no asset fetch,
//! no decoder. [`synthesize`] renders a short two-tone cue with a decaying
//! envelope; [`AudioCue`] caches the rendered buffer behind idempotent
//! `init()` semantics and plays it through an [`AudioSink`] seam.
//!
//! Failure isolation is the point of this crate's design: nothing here
//! panics, `play()` reports failures as a swallowable [`AudioError`], and
//! a missing or rejecting sink degrades the feature to silence without
//! touching the rest of the system.

#![deny(unsafe_code)]

pub mod cue;
pub mod synth;

pub use cue::{AudioCue, AudioError, AudioSink, NullSink};
pub use synth::{CueBuffer, CueSpec, synthesize};
