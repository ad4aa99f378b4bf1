//! Error types for the IMAP codec.

use thiserror::Error;

/// Errors that can occur while decoding an IMAP byte stream.
///
/// Both frame errors are terminal for the connection: the decoder does not
/// try to resynchronize, and the caller is expected to close the stream.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error surfaced through a framed transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token grew past its configured cap.
    #[error("{token} is larger than {limit} bytes")]
    FrameTooLong {
        /// Kind of token that overflowed.
        token: &'static str,
        /// Cap that was exceeded.
        limit: usize,
    },

    /// The input violates the IMAP grammar and can never become valid.
    #[error("corrupted frame: {message}")]
    CorruptedFrame {
        /// Description of what went wrong.
        message: String,
    },
}

impl Error {
    /// Creates a corrupted frame error.
    pub(crate) fn corrupted(message: impl Into<String>) -> Self {
        Self::CorruptedFrame {
            message: message.into(),
        }
    }

    /// Creates a frame too long error.
    pub(crate) const fn too_long(token: &'static str, limit: usize) -> Self {
        Self::FrameTooLong { token, limit }
    }

    /// Returns true if this error comes from the wire grammar rather than the transport.
    #[must_use]
    pub const fn is_frame_error(&self) -> bool {
        matches!(
            self,
            Self::FrameTooLong { .. } | Self::CorruptedFrame { .. }
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
