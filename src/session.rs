//! Link session - lifecycle state machine and loop orchestration.
//!
//! A [`LinkSession`] owns one transport connection end to end:
//!
//! 1. `connect()` opens the transport (`Disconnected → Connecting →
//!    Connected`, or an error surfaced to the caller with no retry).
//! 2. A read loop exclusively holds the read half, feeds every chunk to the
//!    [`FrameAssembler`] and applies parsed frames to [`SharedTelemetry`]
//!    in strict arrival order.
//! 3. A tick loop samples [`SharedControls`] and hands rate-limited command
//!    lines to the writer task.
//!
//! The loops never share a buffer; the read and write halves never
//! serialize against each other. `close()` takes effect at the next loop
//! iteration boundary and releases both halves.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::LinkConfig;
use crate::controls::SharedControls;
use crate::encoder::CommandEncoder;
use crate::error::{LinkError, Result};
use crate::protocol::{parse_telemetry, FrameAssembler};
use crate::telemetry::{SharedTelemetry, TelemetryRecord};
use crate::transport::Transport;
use crate::writer::{spawn_writer_task, WriterHandle};

/// Lifecycle states of a link session.
///
/// `Disconnected → Connecting → Connected → (Closed | Errored)`. There is
/// no automatic reconnect: after `Closed` or `Errored` the session is spent
/// and a fresh `connect()` builds a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    Closed = 3,
    Errored = 4,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionState::Connecting,
            2 => SessionState::Connected,
            3 => SessionState::Closed,
            4 => SessionState::Errored,
            _ => SessionState::Disconnected,
        }
    }
}

/// Lock-free holder for the session state, shared across the loops.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: SessionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    fn get(&self) -> SessionState {
        SessionState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: SessionState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Transition only if the current state matches `from`. Keeps a later
    /// `Closed` from stomping an earlier `Errored` and vice versa.
    fn transition(&self, from: SessionState, to: SessionState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// A running link to the device.
pub struct LinkSession {
    state: Arc<StateCell>,
    telemetry: SharedTelemetry,
    last_error: Arc<Mutex<Option<LinkError>>>,
    close_tx: Option<oneshot::Sender<()>>,
    shutdown_rx: oneshot::Receiver<()>,
    _read_task: JoinHandle<()>,
    _tick_task: JoinHandle<()>,
    _writer_task: JoinHandle<Result<()>>,
}

impl LinkSession {
    /// Open the transport and start the session loops.
    ///
    /// On open failure the error is surfaced and no session exists; the
    /// caller is back at `Disconnected` and may connect again manually.
    pub async fn connect<T: Transport>(
        mut transport: T,
        config: LinkConfig,
        controls: SharedControls,
    ) -> Result<Self> {
        let state = Arc::new(StateCell::new(SessionState::Connecting));

        let stream = match transport.open().await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("transport open failed: {}", e);
                return Err(LinkError::Io(e));
            }
        };
        state.set(SessionState::Connected);
        tracing::debug!("link connected");

        let (read_half, write_half) = tokio::io::split(stream);
        let (writer, writer_task) = spawn_writer_task(write_half);

        let telemetry = SharedTelemetry::new();
        let last_error = Arc::new(Mutex::new(None));
        let (close_tx, close_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let read_task = {
            let state = state.clone();
            let telemetry = telemetry.clone();
            let last_error = last_error.clone();
            let buffer_size = config.read_buffer_size;
            tokio::spawn(async move {
                match read_loop(read_half, telemetry, close_rx, buffer_size).await {
                    Ok(()) => {
                        state.transition(SessionState::Connected, SessionState::Closed);
                        tracing::debug!("read loop exited cleanly");
                    }
                    Err(e) => {
                        tracing::error!("read loop error: {}", e);
                        record_error(&last_error, e);
                        state.transition(SessionState::Connected, SessionState::Errored);
                    }
                }
                let _ = shutdown_tx.send(());
            })
        };

        let tick_task = {
            let state = state.clone();
            let last_error = last_error.clone();
            let writer = writer.clone();
            let encoder = CommandEncoder::new(config.min_send_interval);
            let send_tick = config.send_tick;
            tokio::spawn(async move {
                send_loop(state, last_error, writer, encoder, send_tick, controls).await;
            })
        };

        Ok(Self {
            state,
            telemetry,
            last_error,
            close_tx: Some(close_tx),
            shutdown_rx,
            _read_task: read_task,
            _tick_task: tick_task,
            _writer_task: writer_task,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Whether the session is currently connected.
    pub fn is_connected(&self) -> bool {
        self.state.get() == SessionState::Connected
    }

    /// Handle to the last-known-good telemetry.
    pub fn telemetry(&self) -> SharedTelemetry {
        self.telemetry.clone()
    }

    /// Subscribe to telemetry change events.
    pub fn subscribe(&self) -> mpsc::Receiver<TelemetryRecord> {
        self.telemetry.subscribe()
    }

    /// Request an orderly close.
    ///
    /// Takes effect at the read loop's next iteration boundary; no further
    /// sends are attempted once the state leaves `Connected`. Idempotent.
    pub fn close(&mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait until the read loop has exited, then report how it ended.
    ///
    /// Returns `Ok(())` for an orderly close or a transport EOF, and the
    /// first transport error otherwise.
    pub async fn wait_for_shutdown(self) -> Result<()> {
        let _ = self.shutdown_rx.await;
        let err = self
            .last_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn record_error(slot: &Mutex<Option<LinkError>>, err: LinkError) {
    let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
    if guard.is_none() {
        *guard = Some(err);
    }
}

/// Inbound loop: owns the read half until exit.
///
/// Returns `Ok(())` on orderly close or transport EOF, `Err` on a read
/// error. Any unterminated tail in the assembler is discarded with it - an
/// accepted boundary condition, not data loss to repair.
async fn read_loop<R>(
    mut reader: R,
    telemetry: SharedTelemetry,
    mut close_rx: oneshot::Receiver<()>,
    buffer_size: usize,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut assembler = FrameAssembler::new();
    let mut buf = vec![0u8; buffer_size];

    loop {
        let n = tokio::select! {
            // Close request (or session dropped): release the read half at
            // this iteration boundary.
            _ = &mut close_rx => return Ok(()),
            read = reader.read(&mut buf) => match read {
                Ok(0) => return Ok(()), // transport closed
                Ok(n) => n,
                Err(e) => return Err(LinkError::Io(e)),
            },
        };

        // All frames from this chunk are handled before the next read, so
        // arrival order is preserved and no two frames parse concurrently.
        for frame in assembler.push(&buf[..n]) {
            match parse_telemetry(&frame) {
                Some(update) => {
                    telemetry.apply(&update);
                }
                None => {
                    tracing::debug!("dropping non-telemetry line: {:?}", frame.as_str());
                }
            }
        }
    }
}

/// Outbound loop: samples the controls at each tick and sends when the
/// encoder's cadence allows.
async fn send_loop(
    state: Arc<StateCell>,
    last_error: Arc<Mutex<Option<LinkError>>>,
    writer: WriterHandle,
    mut encoder: CommandEncoder,
    send_tick: std::time::Duration,
    controls: SharedControls,
) {
    let mut ticker = tokio::time::interval(send_tick);
    // Missed ticks are never caught up; the next tick sends current values.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if state.get() != SessionState::Connected {
            return;
        }
        if let Some(line) = encoder.maybe_encode(Instant::now(), controls.get()) {
            if let Err(e) = writer.send(line).await {
                tracing::error!("command send failed: {}", e);
                record_error(&last_error, e);
                state.transition(SessionState::Connected, SessionState::Errored);
                return;
            }
        }
    }
}
