//! # mailwire-proxy
//!
//! A pass-through IMAP proxy. Every client connection gets its own upstream
//! connection; commands and responses are decoded with `mailwire-imap` and
//! re-encoded on the other side, so anything the codec rejects never reaches
//! the peer.
//!
//! Synchronizing literals (`{n}` without `+`) are not relayed until the whole
//! command has arrived, so a client that waits for the server's continuation
//! request before sending the payload will stall. Clients should use
//! non-synchronizing literals (`{n+}`) through the proxy.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
mod relay;

pub use config::{ProxyConfig, ProxyConfigBuilder};
pub use error::{ProxyError, Result};
pub use relay::{relay, run, serve};
