//! The login handshake.
//!
//! Runs on the connection's own task, before the session exists: MOTD,
//! name negotiation, then either a password check for a known character or
//! password creation for a new one. Only after the whole exchange succeeds
//! is the session admitted to the registry and handed to the scheduler.
//!
//! A known character gets exactly one password attempt; a mismatch drops
//! the connection. Creating a character retries the type-it-twice exchange
//! until the two entries agree.

use crate::dispatch;
use crate::error::AuthError;
use crate::network::session_io::{printable, spawn_reader, spawn_writer};
use crate::state::{Player, Realm, Session};
use crate::state::session::INBOUND_LINE_BUFFER;
use crate::store::Profile;
use crate::text::{capitalize_first, colorize};
use futures_util::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Notify, mpsc};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::info;
use zeroize::Zeroizing;

/// Hard cap on one line; longer input is a protocol violation, not a
/// buffer to grow.
const MAX_LINE: usize = 512;

/// Releases a pending-name reservation when the handshake ends, however
/// it ends.
struct NameReservation<'a> {
    realm: &'a Realm,
    name: String,
}

impl Drop for NameReservation<'_> {
    fn drop(&mut self) {
        self.realm.release_name(&self.name);
    }
}

async fn next_line<R>(lines: &mut FramedRead<R, LinesCodec>) -> Result<String, AuthError>
where
    R: AsyncRead + Unpin,
{
    match lines.next().await {
        Some(Ok(line)) => Ok(printable(&line)),
        Some(Err(e)) => Err(e.into()),
        None => Err(AuthError::Closed),
    }
}

async fn prompt<W>(writer: &mut W, text: &str) -> Result<(), AuthError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(colorize(text).as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Run the full handshake on a fresh connection, admitting the session on
/// success. Generic over the stream so tests can drive it with an
/// in-memory duplex pipe.
pub async fn handshake<S>(stream: S, addr: SocketAddr, realm: Arc<Realm>) -> Result<(), AuthError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, mut writer) = tokio::io::split(stream);
    let mut lines = FramedRead::new(read_half, LinesCodec::new_with_max_length(MAX_LINE));

    prompt(&mut writer, &format!("{}\n\r", realm.info.motd)).await?;

    // Name negotiation loops until the client settles on one.
    let (name, existing) = loop {
        prompt(&mut writer, "Please input your name: ").await?;
        let line = next_line(&mut lines).await?;
        let name = line.split(' ').next().unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        if realm.store.profile_exists(&name) {
            break (capitalize_first(&name), true);
        }

        prompt(&mut writer, &format!("\nIs {name} okay as a name (y/n)? ")).await?;
        let confirm = next_line(&mut lines).await?.trim().to_lowercase();
        if confirm.starts_with('y') {
            let name = capitalize_first(&name);
            prompt(&mut writer, &format!("Player name set to {name}.\n\r")).await?;
            break (name, false);
        }
    };

    // Reserve the name so a simultaneous handshake can't race us to it.
    if !realm.reserve_name(&name) {
        prompt(&mut writer, "That name is already in use.\n\r").await?;
        return Err(AuthError::NameInUse(name));
    }
    let reservation = NameReservation {
        realm: &*realm,
        name: name.clone(),
    };

    let profile = if existing {
        prompt(&mut writer, "Please input your Password: ").await?;
        let secret = Zeroizing::new(next_line(&mut lines).await?);
        if !realm.store.verify_credential(&name, &secret)? {
            return Err(AuthError::WrongPassword(name));
        }
        realm.store.load_profile(&name)?
    } else {
        loop {
            prompt(&mut writer, "Please input your new Password: ").await?;
            let first = Zeroizing::new(next_line(&mut lines).await?);
            prompt(&mut writer, "Please confirm your new Password: ").await?;
            let second = Zeroizing::new(next_line(&mut lines).await?);
            if *first == *second {
                realm.store.create_credential(&name, &first)?;
                prompt(&mut writer, "Player's password was set.\n\r").await?;
                let profile = Profile::fresh(&name);
                realm.store.save_profile(&profile)?;
                break profile;
            }
            prompt(
                &mut writer,
                "Player's passwords did not match. Please try again.\n\r",
            )
            .await?;
        }
    };

    // Admission: build the session and its channels, then take the
    // registry's word on uniqueness.
    let quit = Arc::new(AtomicBool::new(false));
    let closed = Arc::new(Notify::new());
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::channel(INBOUND_LINE_BUFFER);
    let session = Session::new(
        name.clone(),
        addr,
        realm.is_admin(&name),
        Player::from_profile(&profile),
        Arc::clone(&quit),
        Arc::clone(&closed),
        out_tx,
        in_rx,
    );

    let Some(session) = realm.registry.admit(session) else {
        prompt(&mut writer, "That character is already online.\n\r").await?;
        return Err(AuthError::NameInUse(name));
    };
    drop(reservation);

    spawn_reader(lines, in_tx, Arc::clone(&quit), Arc::clone(&closed));
    spawn_writer(writer, out_rx, quit, closed);

    info!(name = %name, %addr, admin = session.admin, "Session admitted");
    realm
        .registry
        .info_all(&format!("{name} has logged into {}.", realm.info.name));
    dispatch::dispatch(&realm, &session, "look");

    Ok(())
}
