//! Integration test common infrastructure.
//!
//! Spawns real server processes and drives them over TCP like a telnet
//! client would.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
