//! The TCP accept loop.

use crate::error::AuthError;
use crate::network::auth;
use crate::state::Realm;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

pub struct Gateway {
    listener: TcpListener,
    realm: Arc<Realm>,
}

impl Gateway {
    /// Bind the listening socket. Failure here is fatal for startup.
    pub async fn bind(addr: SocketAddr, realm: Arc<Realm>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "Gateway listening");
        Ok(Self { listener, realm })
    }

    /// Accept connections forever, one handshake task per connection. An
    /// accept error is fatal, and so is a store failure during a handshake
    /// (relayed through the realm's fatal signal); other handshake failures
    /// only end their own task.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            let _ = stream.set_nodelay(true);
            debug!(%addr, "Connection accepted");

            let realm = Arc::clone(&self.realm);
            tokio::spawn(async move {
                if let Err(e) = auth::handshake(stream, addr, Arc::clone(&realm)).await {
                    match &e {
                        AuthError::Store(_) => {
                            error!(%addr, error = %e, "Persistence failure during admission");
                            realm.raise_fatal(format!(
                                "persistence failure during admission: {e}"
                            ));
                        }
                        _ if e.is_noteworthy() => warn!(%addr, error = %e, "Login rejected"),
                        _ => debug!(%addr, error = %e, "Connection ended during handshake"),
                    }
                }
            });
        }
    }
}
