//! The reader and writer tasks serving one admitted session.
//!
//! Neither task holds an `Arc<Session>`: they share only the quit flag, the
//! close notifier, and their channel end. Teardown is symmetric — when the
//! session leaves the registry its channels close, the writer flushes and
//! shuts the socket down, and the notifier unblocks the reader.

use crate::text::colorize;
use futures_util::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Notify, mpsc};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::debug;

/// Strip everything outside printable ASCII; telnet negotiation bytes and
/// control characters never reach the dispatcher.
pub fn printable(line: &str) -> String {
    line.chars().filter(|c| (' '..='~').contains(c)).collect()
}

/// Read complete lines off the socket into the session's bounded inbound
/// channel. A full channel blocks the read, which pushes backpressure down
/// to TCP instead of buffering a flooding client without bound.
pub fn spawn_reader<R>(
    mut lines: FramedRead<R, LinesCodec>,
    tx: mpsc::Sender<String>,
    quit: Arc<AtomicBool>,
    closed: Arc<Notify>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = closed.notified() => break,
                line = lines.next() => match line {
                    Some(Ok(line)) => {
                        if tx.send(printable(&line)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "Reader ending on framing error");
                        quit.store(true, Ordering::Release);
                        break;
                    }
                    None => {
                        quit.store(true, Ordering::Release);
                        break;
                    }
                },
            }
        }
    });
}

/// Drain the session's outbound channel onto the socket, resolving color
/// markup on the way out. Ends when the channel closes (session removed)
/// or the peer stops accepting writes.
pub fn spawn_writer<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<String>,
    quit: Arc<AtomicBool>,
    closed: Arc<Notify>,
) where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if writer.write_all(colorize(&msg).as_bytes()).await.is_err() {
                quit.store(true, Ordering::Release);
                break;
            }
        }
        let _ = writer.shutdown().await;
        closed.notify_waiters();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_strips_control_bytes() {
        assert_eq!(printable("look\u{1b}[A\u{7}"), "look[A");
        assert_eq!(printable("north\r"), "north");
        assert_eq!(printable("say hi!"), "say hi!");
    }

    #[tokio::test]
    async fn test_reader_feeds_lines_and_flags_eof() {
        let (client, server) = tokio::io::duplex(256);
        let lines = FramedRead::new(server, LinesCodec::new_with_max_length(512));
        let (tx, mut rx) = mpsc::channel(8);
        let quit = Arc::new(AtomicBool::new(false));
        spawn_reader(lines, tx, Arc::clone(&quit), Arc::new(Notify::new()));

        let mut client = client;
        client.write_all(b"north\r\neast\r\n").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "north");
        assert_eq!(rx.recv().await.unwrap(), "east");

        drop(client);
        // Reader observes EOF, raises the quit flag, and drops its sender
        assert!(rx.recv().await.is_none());
        assert!(quit.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_writer_colorizes_and_closes_on_channel_end() {
        use tokio::io::AsyncReadExt;

        let (mut client, server) = tokio::io::duplex(256);
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(Notify::new());
        spawn_writer(server, rx, Arc::new(AtomicBool::new(false)), Arc::clone(&closed));

        tx.send("#rhot#n\n\r".to_string()).unwrap();
        drop(tx);

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"\x1b[0;31mhot\x1b[0;0m\n\r");
    }
}
