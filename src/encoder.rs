//! Outgoing command encoding with a minimum send cadence.

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::controls::ControlValues;

/// Encode one command frame: `red,yellow,green\n`, no internal whitespace.
pub fn encode_command(values: ControlValues) -> Bytes {
    Bytes::from(format!(
        "{},{},{}\n",
        values.red, values.yellow, values.green
    ))
}

/// Rate-limited encoder for outgoing control values.
///
/// Fires only when strictly more than `min_interval` has elapsed since the
/// previous fire; the first call after construction always fires. This is a
/// best-effort rate limiter, not a precise timer: missed ticks are never
/// queued or caught up, the next qualifying call sends the then-current
/// values.
#[derive(Debug)]
pub struct CommandEncoder {
    min_interval: Duration,
    last_sent: Option<Instant>,
}

impl CommandEncoder {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_sent: None,
        }
    }

    /// Encode the current values if the cadence allows a send at `now`.
    ///
    /// Advancing the timer and encoding are a single unit; the caller hands
    /// the returned bytes to the transport and does not retry on failure.
    pub fn maybe_encode(&mut self, now: Instant, values: ControlValues) -> Option<Bytes> {
        if let Some(last) = self.last_sent {
            if now.duration_since(last) <= self.min_interval {
                return None;
            }
        }
        self.last_sent = Some(now);
        Some(encode_command(values))
    }

    /// When the encoder last fired, if ever.
    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }
}
