//! Transport boundary - the externally supplied byte-stream connection.
//!
//! The core never opens serial ports itself. Port discovery, permission
//! prompts and open/close lifecycle belong to the embedding application; it
//! hands the session something that can produce one async byte stream. A
//! serial implementation would configure the port at
//! [`DEFAULT_BAUD_RATE`](crate::config::DEFAULT_BAUD_RATE); tests use
//! [`tokio::io::duplex`].

use std::future::Future;
use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

/// Source of the bidirectional byte stream a session runs over.
///
/// `open` is called exactly once per connect attempt. Failure surfaces to
/// the caller of [`LinkSession::connect`](crate::session::LinkSession::connect)
/// and is never retried automatically.
pub trait Transport {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn open(&mut self) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Adapter for a stream the caller has already opened.
pub struct StreamTransport<S> {
    stream: Option<S>,
}

impl<S> StreamTransport<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }
}

impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    type Stream = S;

    fn open(&mut self) -> impl Future<Output = io::Result<Self::Stream>> + Send {
        let stream = self.stream.take();
        async move {
            stream.ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotConnected, "stream already consumed")
            })
        }
    }
}
