//! Last-known-good telemetry state and its presentation surface.
//!
//! [`SharedTelemetry`] is the single source of truth for downstream
//! consumers. It is only ever written from the session's parse branch; the
//! presentation layer polls [`snapshot`](SharedTelemetry::snapshot) or
//! subscribes for change events. Correctness of the values is entirely
//! delegated to the parser - no validation happens here.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::mpsc;

/// Capacity of each subscriber channel. Telemetry is state, not a log:
/// a subscriber that falls behind misses intermediate snapshots and can
/// always re-poll the current one.
pub const SUBSCRIBER_CHANNEL_CAPACITY: usize = 16;

/// Device operating mode, decoded from the wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    Mode1,
    Mode2,
    Mode3,
    Default,
}

impl Mode {
    /// Total mapping from wire token to mode variant.
    ///
    /// Unrecognized tokens map to `None`, meaning "leave the current mode
    /// unchanged" - they never force `Default`.
    pub fn from_wire_token(token: &str) -> Option<Self> {
        match token {
            "PCINT1" => Some(Mode::Mode1),
            "PCINT2" => Some(Mode::Mode2),
            "PCINT3" => Some(Mode::Mode3),
            "Default" => Some(Mode::Default),
            _ => None,
        }
    }

    /// Presentation name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Mode1 => "Mode1",
            Mode::Mode2 => "Mode2",
            Mode::Mode3 => "Mode3",
            Mode::Default => "Default",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decoded device state: brightness, mode and the indicator triple
/// `[red, yellow, green]` with each element 0 or 1.
///
/// Brightness is reported by the device in 0-255 but deliberately not
/// clamped here; the record stores whatever the wire carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetryRecord {
    pub brightness: u32,
    pub mode: Mode,
    pub indicators: [u8; 3],
}

impl Default for TelemetryRecord {
    fn default() -> Self {
        Self {
            brightness: 0,
            mode: Mode::Default,
            indicators: [0, 0, 0],
        }
    }
}

impl TelemetryRecord {
    /// Overwrite the fields present in `update`, retaining the rest.
    pub fn apply(&mut self, update: &TelemetryUpdate) {
        if let Some(brightness) = update.brightness {
            self.brightness = brightness;
        }
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
        if let Some(indicators) = update.indicators {
            self.indicators = indicators;
        }
    }
}

/// Per-field deltas extracted from one structurally valid frame.
///
/// `None` in a field means "no change": either the frame's field failed its
/// own validation (unknown mode token, wrong indicator count) or, for
/// brightness, the defensive numeric gate tripped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetryUpdate {
    pub brightness: Option<u32>,
    pub mode: Option<Mode>,
    pub indicators: Option<[u8; 3]>,
}

impl TelemetryUpdate {
    /// Whether every field defaulted to no-change.
    pub fn is_noop(&self) -> bool {
        self.brightness.is_none() && self.mode.is_none() && self.indicators.is_none()
    }
}

struct Inner {
    record: TelemetryRecord,
    subscribers: Vec<mpsc::Sender<TelemetryRecord>>,
}

/// Cheaply cloneable handle to the latest telemetry record.
#[derive(Clone)]
pub struct SharedTelemetry {
    inner: Arc<RwLock<Inner>>,
}

impl SharedTelemetry {
    /// Create a handle holding the startup default record.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                record: TelemetryRecord::default(),
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current record, by value.
    pub fn snapshot(&self) -> TelemetryRecord {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).record
    }

    /// Subscribe to change events.
    ///
    /// Every applied update delivers the post-update snapshot. Delivery is
    /// best effort: a full channel drops the event (the subscriber can
    /// re-poll), a closed channel drops the subscriber.
    pub fn subscribe(&self) -> mpsc::Receiver<TelemetryRecord> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .push(tx);
        rx
    }

    /// Apply an update and notify subscribers.
    ///
    /// Called only from the session's successful-parse branch. A no-op
    /// update still notifies: the frame structurally matched, so the
    /// presentation refresh fires exactly as it would for changed values.
    pub fn apply(&self, update: &TelemetryUpdate) -> TelemetryRecord {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.record.apply(update);
        let record = inner.record;
        inner.subscribers.retain(|tx| match tx.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => true,
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
        record
    }
}

impl Default for SharedTelemetry {
    fn default() -> Self {
        Self::new()
    }
}
