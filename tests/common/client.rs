//! A minimal telnet-style test client.
//!
//! The server prompts without trailing newlines, so the client works on a
//! raw byte buffer and waits for substrings rather than whole lines.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(3);

pub struct TestClient {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl TestClient {
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            buf: Vec::new(),
        })
    }

    /// Send one command line, CRLF-terminated.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.stream
            .write_all(format!("{line}\r\n").as_bytes())
            .await?;
        Ok(())
    }

    /// Read until the accumulated output contains `needle`, consuming
    /// everything through the match.
    pub async fn expect(&mut self, needle: &str) -> anyhow::Result<()> {
        let deadline = tokio::time::Instant::now() + WAIT;
        loop {
            let text = String::from_utf8_lossy(&self.buf).into_owned();
            if let Some(pos) = text.find(needle) {
                // The buffer is plain ASCII from the server, so the text
                // offset is a byte offset.
                self.buf.drain(..pos + needle.len());
                return Ok(());
            }

            let mut chunk = [0u8; 1024];
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            let n = timeout(remaining, self.stream.read(&mut chunk))
                .await
                .map_err(|_| anyhow::anyhow!("timed out waiting for {needle:?}; got {text:?}"))??;
            if n == 0 {
                anyhow::bail!("connection closed waiting for {needle:?}; got {text:?}");
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Assert the server closes the connection without sending `forbidden`.
    pub async fn expect_close(&mut self, forbidden: &str) -> anyhow::Result<()> {
        let deadline = tokio::time::Instant::now() + WAIT;
        loop {
            let mut chunk = [0u8; 1024];
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            let n = timeout(remaining, self.stream.read(&mut chunk))
                .await
                .map_err(|_| anyhow::anyhow!("timed out waiting for close"))??;
            if n == 0 {
                let text = String::from_utf8_lossy(&self.buf).into_owned();
                if text.contains(forbidden) {
                    anyhow::bail!("connection sent {forbidden:?} before closing: {text:?}");
                }
                return Ok(());
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Run the new-character handshake end to end.
    pub async fn create(addr: &str, name: &str, password: &str) -> anyhow::Result<Self> {
        let mut client = Self::connect(addr).await?;
        client.expect("Please input your name: ").await?;
        client.send(name).await?;
        client.expect("okay as a name (y/n)? ").await?;
        client.send("y").await?;
        client.expect("Please input your new Password: ").await?;
        client.send(password).await?;
        client.expect("Please confirm your new Password: ").await?;
        client.send(password).await?;
        client.expect("Player's password was set.").await?;
        // The login broadcast and the first room render
        client.expect("has logged into TestWorld.").await?;
        client.expect("> ").await?;
        Ok(client)
    }

    /// Log an existing character in (single password attempt).
    pub async fn login(addr: &str, name: &str, password: &str) -> anyhow::Result<Self> {
        let mut client = Self::connect(addr).await?;
        client.expect("Please input your name: ").await?;
        client.send(name).await?;
        client.expect("Please input your Password: ").await?;
        client.send(password).await?;
        client.expect("has logged into TestWorld.").await?;
        client.expect("> ").await?;
        Ok(client)
    }
}
