//! # lightlink
//!
//! Host-side link to a traffic-light demo microcontroller over an
//! asynchronous serial byte stream.
//!
//! The device reports its state as newline-terminated telemetry lines
//! (`B: 160 M: PCINT2 O: 1,0,1`); the host periodically sends back three
//! slider values as `red,yellow,green\n`, at most once per minimum
//! interval. This crate is the protocol engine in between:
//!
//! - **Inbound**: chunked bytes → [`protocol::FrameAssembler`] → complete
//!   lines → [`protocol::parse_telemetry`] → [`SharedTelemetry`], the
//!   last-known-good record the presentation layer polls or subscribes to.
//! - **Outbound**: a periodic tick → [`encoder::CommandEncoder`] →
//!   transport, gated by the minimum send interval and fed from
//!   [`SharedControls`].
//! - [`LinkSession`] orchestrates both directions over one transport.
//!
//! Transport lifecycle (port discovery, open, permissions) and rendering
//! are external collaborators; the session only needs something
//! implementing [`transport::Transport`].
//!
//! ## Example
//!
//! ```ignore
//! use lightlink::{ControlValues, LinkConfig, LinkSession, SharedControls};
//! use lightlink::transport::StreamTransport;
//!
//! #[tokio::main]
//! async fn main() -> lightlink::Result<()> {
//!     let stream = open_serial_port()?; // external collaborator
//!     let controls = SharedControls::with_values(ControlValues::new(2000, 500, 2000));
//!     let session = LinkSession::connect(
//!         StreamTransport::new(stream),
//!         LinkConfig::default(),
//!         controls.clone(),
//!     )
//!     .await?;
//!
//!     let mut events = session.subscribe();
//!     while let Some(snapshot) = events.recv().await {
//!         println!("brightness {} mode {}", snapshot.brightness, snapshot.mode);
//!     }
//!     session.wait_for_shutdown().await
//! }
//! ```

pub mod config;
pub mod controls;
pub mod encoder;
pub mod error;
pub mod protocol;
pub mod session;
pub mod telemetry;
pub mod transport;

mod writer;

pub use config::LinkConfig;
pub use controls::{ControlValues, SharedControls};
pub use error::{LinkError, Result};
pub use session::{LinkSession, SessionState};
pub use telemetry::{Mode, SharedTelemetry, TelemetryRecord, TelemetryUpdate};
