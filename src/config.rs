//! Link configuration.
//!
//! All values are fixed at session start; nothing is negotiated with the
//! device at runtime.

use std::time::Duration;

/// Default minimum interval between two outgoing command frames.
pub const DEFAULT_MIN_SEND_INTERVAL: Duration = Duration::from_millis(500);

/// Default granularity of the send tick that drives the command encoder.
pub const DEFAULT_SEND_TICK: Duration = Duration::from_millis(50);

/// Default size of the inbound read buffer.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Line rate the device side runs at. Transport implementations that open a
/// real serial port should configure it with this value; the core never
/// looks at it.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Configuration for a [`LinkSession`](crate::session::LinkSession).
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Minimum elapsed time between two command sends (strict inequality).
    pub min_send_interval: Duration,
    /// How often the send path wakes up to check the timer. This is a
    /// best-effort rate limiter, not a precise schedule: a missed tick is
    /// never caught up, the next qualifying tick sends the then-current
    /// values.
    pub send_tick: Duration,
    /// Inbound read buffer size in bytes.
    pub read_buffer_size: usize,
    /// Baud-equivalent rate for serial transport implementations.
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            min_send_interval: DEFAULT_MIN_SEND_INTERVAL,
            send_tick: DEFAULT_SEND_TICK,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}
