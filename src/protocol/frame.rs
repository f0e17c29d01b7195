//! Frame type - one trimmed line of the wire protocol.

use std::fmt;

/// A single line extracted from the inbound byte stream, terminator-stripped
/// and whitespace-trimmed.
///
/// Frames are ephemeral: the assembler yields them and the parser consumes
/// them immediately. A blank line on the wire becomes an empty frame, which
/// is yielded here and rejected downstream by the parser, not at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(String);

impl Frame {
    /// Build a frame from the raw bytes of one line (terminator already
    /// split off).
    ///
    /// Decodes lossily; a line with invalid UTF-8 turns into replacement
    /// characters and falls out at the parser rather than erroring here.
    pub fn from_line_bytes(bytes: &[u8]) -> Self {
        Self(String::from_utf8_lossy(bytes).trim().to_string())
    }

    /// The trimmed line text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the trimmed line is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the trimmed line in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Frame {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_trims_surrounding_whitespace() {
        let frame = Frame::from_line_bytes(b"  B: 160 M: Default O: 0,0,0 \r");
        assert_eq!(frame.as_str(), "B: 160 M: Default O: 0,0,0");
    }

    #[test]
    fn test_frame_empty_line() {
        let frame = Frame::from_line_bytes(b"   \r");
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }

    #[test]
    fn test_frame_lossy_decode_does_not_panic() {
        let frame = Frame::from_line_bytes(&[0xff, 0xfe, b'x']);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_frame_from_str() {
        let frame = Frame::from(" hello ");
        assert_eq!(frame.as_str(), "hello");
        assert_eq!(frame.to_string(), "hello");
    }
}
