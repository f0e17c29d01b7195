//! Wire protocol: line framing and telemetry parsing.
//!
//! Inbound, the device sends newline-terminated ASCII lines of the form
//!
//! ```text
//! B: <digits> M: <token> O: <digits>,<digits>,<digits>
//! ```
//!
//! with flexible internal whitespace and optional trailing content, which
//! [`parse_telemetry`] turns into a [`TelemetryUpdate`](crate::telemetry::TelemetryUpdate).
//! Outbound, the host sends `red,yellow,green\n` built by
//! [`encode_command`](crate::encoder::encode_command).

mod assembler;
mod frame;
mod parser;

pub use assembler::FrameAssembler;
pub use frame::Frame;
pub use parser::parse_telemetry;
