//! Unified error handling for embermud.

use thiserror::Error;

/// Errors from the flat-file profile and credential store.
///
/// Persistence failures during admission or reaping are fatal for the
/// process, so these mostly bubble up to `main` via `anyhow`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile for {0} not found")]
    MissingProfile(String),

    #[error("credential for {0} not found")]
    MissingCredential(String),

    #[error("malformed profile for {name}: {detail}")]
    Malformed { name: String, detail: String },
}

/// Errors from the authentication handshake.
///
/// Most handshake failures just end the connection task; these variants
/// exist so the flow can log why.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("connection closed during handshake")]
    Closed,

    #[error("line framing error: {0}")]
    Framing(#[from] tokio_util::codec::LinesCodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("incorrect password for {0}")]
    WrongPassword(String),

    #[error("name {0} is already in use")]
    NameInUse(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Whether this rejection is worth an operator-visible log line, as
    /// opposed to routine client churn (half-open scans, early closes).
    /// Store failures are handled separately: they are fatal.
    pub fn is_noteworthy(&self) -> bool {
        matches!(self, Self::WrongPassword(_) | Self::NameInUse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_noteworthy() {
        assert!(AuthError::WrongPassword("Bob".into()).is_noteworthy());
        assert!(AuthError::NameInUse("Alice".into()).is_noteworthy());
        assert!(!AuthError::Closed.is_noteworthy());
    }

    #[test]
    fn test_store_error_display() {
        let e = StoreError::MissingProfile("bob".into());
        assert_eq!(e.to_string(), "profile for bob not found");
    }
}
