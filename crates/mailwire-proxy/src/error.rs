//! Error types for the proxy.

use thiserror::Error;

/// Errors that end a proxied connection or the listener.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The IMAP stream on either side could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] mailwire_imap::Error),

    /// Socket error while accepting or connecting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not reach the upstream server.
    #[error("cannot connect to upstream {addr}: {source}")]
    Upstream {
        /// Upstream address as `host:port`.
        addr: String,
        /// Underlying connect error.
        source: std::io::Error,
    },
}

/// Result type alias using the proxy error type.
pub type Result<T> = std::result::Result<T, ProxyError>;
