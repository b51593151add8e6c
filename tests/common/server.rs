//! Test server management.

use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::sleep;

/// A server process under test, with its own data directory and port.
pub struct TestServer {
    child: Child,
    port: u16,
    data_dir: PathBuf,
}

impl TestServer {
    /// Spawn a server on the given port with a fast tick and a small,
    /// seeded world.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        let data_dir = std::env::temp_dir().join(format!("embermud-test-{port}"));
        let _ = std::fs::remove_dir_all(&data_dir);
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join("embermud.toml");
        let config_content = format!(
            r#"
listen = "127.0.0.1:{port}"

[server]
name = "TestWorld"
admin = "Ember"
tick_ms = 20

[world]
rooms = 40
items = 5
seed = 7

[data]
dir = "{}/data"
"#,
            data_dir.display()
        );
        std::fs::write(&config_path, config_content)?;

        let binary_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/debug/embermudd");
        let child = Command::new(&binary_path)
            .arg(config_path.to_str().ok_or_else(|| anyhow::anyhow!("bad config path"))?)
            .spawn()?;

        let server = Self {
            child,
            port,
            data_dir,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// The server's persistence root (profiles and credentials live here).
    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join("data")
    }

    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..100 {
            if TcpStream::connect(self.address()).await.is_ok() {
                return Ok(());
            }
            sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server on port {} never started listening", self.port)
    }

    /// Whether the process has exited yet (non-blocking).
    pub fn has_exited(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}
