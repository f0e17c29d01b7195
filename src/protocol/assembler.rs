//! Frame assembler for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for buffer management. Inbound chunks may end
//! anywhere - mid-line, between lines, or carrying several lines at once -
//! so the buffer holds at most one unterminated tail between calls and
//! every complete line is yielded in strict arrival order.

use bytes::BytesMut;

use super::Frame;

/// Initial capacity of the accumulation buffer. Telemetry lines are short,
/// a few reads worth of slack is plenty.
const INITIAL_CAPACITY: usize = 256;

/// Buffer for accumulating incoming bytes and extracting complete
/// newline-delimited frames.
///
/// This layer never fails and never drops or reorders a frame: malformed
/// content is someone else's problem (the parser's), and an unterminated
/// tail simply waits for the next chunk. Tail data still buffered when the
/// link closes is discarded with the assembler.
#[derive(Debug)]
pub struct FrameAssembler {
    /// Accumulated bytes not yet resolved into a frame.
    buffer: BytesMut,
}

impl FrameAssembler {
    /// Create a new frame assembler.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Push a chunk of inbound bytes and extract all complete frames.
    ///
    /// Returns zero or more frames in arrival order. Zero is common when a
    /// chunk ends mid-line. An empty line yields an empty frame; rejecting
    /// it is the parser's job.
    pub fn push(&mut self, data: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one() {
            frames.push(frame);
        }
        frames
    }

    /// Split off one frame at the first newline, retaining the remainder.
    fn try_extract_one(&mut self) -> Option<Frame> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line = self.buffer.split_to(pos + 1);
        Some(Frame::from_line_bytes(&line[..pos]))
    }

    /// Number of buffered bytes awaiting a terminator.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no partial data is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard any buffered partial data.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}
