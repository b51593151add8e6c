//! Networking: the accept loop, the login handshake, and per-connection
//! I/O tasks.

pub mod auth;
pub mod gateway;
pub mod session_io;

pub use gateway::Gateway;
