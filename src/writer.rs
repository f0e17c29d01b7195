//! Dedicated writer task owning the transport write half.
//!
//! Senders hand complete command lines to an mpsc channel; the task writes
//! and flushes them one at a time. A single send is an atomic unit from the
//! caller's perspective - there is no partial-send recovery and no retry.
//! The write half is held for exactly as long as the task lives and is
//! released on every exit path.

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{LinkError, Result};

/// Channel capacity for outbound lines. Commands are tiny and rate-limited
/// upstream, so a handful of slots is generous.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Handle for queueing outbound lines to the writer task.
///
/// Cheaply cloneable.
#[derive(Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<Bytes>,
}

impl WriterHandle {
    /// Queue one line for sending.
    ///
    /// Fails with [`LinkError::ConnectionClosed`] once the writer task has
    /// exited (transport write failure or session teardown).
    pub async fn send(&self, line: Bytes) -> Result<()> {
        self.tx
            .send(line)
            .await
            .map_err(|_| LinkError::ConnectionClosed)
    }
}

/// Spawn the writer task for the given write half.
///
/// The task exits cleanly when every handle is dropped, or with an error on
/// the first failed write.
pub fn spawn_writer_task<W>(writer: W) -> (WriterHandle, JoinHandle<Result<()>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
    let task = tokio::spawn(writer_loop(rx, writer));
    (WriterHandle { tx }, task)
}

async fn writer_loop<W>(mut rx: mpsc::Receiver<Bytes>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        if let Err(e) = write_line(&mut writer, &line).await {
            tracing::error!("transport write failed: {}", e);
            return Err(e);
        }
    }
    // All handles dropped, clean shutdown.
    Ok(())
}

async fn write_line<W>(writer: &mut W, line: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{duplex, AsyncReadExt};

    #[tokio::test]
    async fn test_send_writes_line() {
        let (client, mut server) = duplex(256);
        let (handle, _task) = spawn_writer_task(client);

        handle.send(Bytes::from_static(b"1,2,3\n")).await.unwrap();

        let mut buf = vec![0u8; 16];
        let n = server.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"1,2,3\n");
    }

    #[tokio::test]
    async fn test_lines_preserve_order() {
        let (client, mut server) = duplex(256);
        let (handle, _task) = spawn_writer_task(client);

        for i in 0..5u32 {
            handle
                .send(Bytes::from(format!("{},{},{}\n", i, i, i)))
                .await
                .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(20)).await;

        let mut buf = vec![0u8; 128];
        let n = server.read(&mut buf).await.unwrap();
        let text = std::str::from_utf8(&buf[..n]).unwrap();
        assert_eq!(text, "0,0,0\n1,1,1\n2,2,2\n3,3,3\n4,4,4\n");
    }

    #[tokio::test]
    async fn test_clean_shutdown_on_handle_drop() {
        let (client, _server) = duplex(256);
        let (handle, task) = spawn_writer_task(client);

        drop(handle);

        let result = task.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_after_peer_gone_reports_closed() {
        let (client, server) = duplex(16);
        let (handle, task) = spawn_writer_task(client);

        // Closing the peer makes the next write fail and the task exit.
        drop(server);
        handle.send(Bytes::from_static(b"0,0,0\n")).await.unwrap();
        let result = task.await.unwrap();
        assert!(result.is_err());

        // Subsequent sends find the channel closed.
        let result = handle.send(Bytes::from_static(b"0,0,0\n")).await;
        assert!(matches!(result, Err(LinkError::ConnectionClosed)));
    }
}
