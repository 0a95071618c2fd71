//! Handler fan-out with per-handler failure isolation.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::warn;

use crate::envelope::EventEnvelope;
use crate::kind::EventKind;

/// Boxed error a handler may return.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// One consumer of classified events.
///
/// Handlers are independent: a failure (error or panic) in one never
/// prevents the others from running.
pub trait EventHandler: Send + Sync {
    /// Short name used in failure logs.
    fn name(&self) -> &str;

    /// Whether this handler wants events of the given kind.
    fn matches(&self, kind: EventKind) -> bool;

    /// Process one envelope.
    fn handle(&self, envelope: &EventEnvelope) -> Result<(), HandlerError>;
}

/// Invoke every handler whose predicate matches the envelope's kind.
///
/// Returns the number of handlers that ran (successfully or not). Errors
/// and panics are logged and swallowed so the remaining handlers and the
/// connection itself are unaffected.
pub fn dispatch(envelope: &EventEnvelope, handlers: &[&dyn EventHandler]) -> usize {
    let mut ran = 0;
    for handler in handlers {
        if !handler.matches(envelope.kind) {
            continue;
        }
        ran += 1;
        let outcome = catch_unwind(AssertUnwindSafe(|| handler.handle(envelope)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                warn!(handler = handler.name(), kind = %envelope.kind, %error, "handler failed");
            }
            Err(_) => {
                warn!(handler = handler.name(), kind = %envelope.kind, "handler panicked");
            }
        }
    }
    ran
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
