//! # mailwire-imap
//!
//! A streaming IMAP4 command/response codec.
//!
//! The decoders turn an arbitrarily fragmented byte stream into immutable
//! [`Command`] and [`Response`] values, and the serializers turn those values
//! back into bytes. The codec owns no sockets: it is handed a growing
//! [`bytes::BytesMut`] and re-invoked whenever more bytes arrive.
//!
//! ## Features
//!
//! - **Resumable**: decoding can stop at any byte and continue on the next
//!   call, with the same output however the input was split
//! - **Binary-safe literals**: `{n}` and `{n+}` payloads are read by count,
//!   never scanned for delimiters
//! - **Bounded memory**: every token has a configurable cap
//! - **`tokio_util` integration**: [`ServerCodec`] and [`ClientCodec`] plug
//!   into `Framed`, `FramedRead` and `FramedWrite`
//!
//! ## Quick Start
//!
//! ```
//! use bytes::BytesMut;
//! use mailwire_imap::{Parameter, Response, ResponseDecoder};
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut buf = BytesMut::from(&b"* 12 FETCH (FLAGS (\\Seen))\r\nA1 OK done\r\n"[..]);
//!
//! let responses = decoder.decode_all(&mut buf)?;
//! assert_eq!(responses.len(), 2);
//! assert!(matches!(responses[0], Response::MessageStatus { number: 12, .. }));
//! assert_eq!(responses[1].tag(), Some("A1"));
//!
//! // Serializing gives back the original line.
//! assert_eq!(responses[1].to_bytes(), b"A1 OK done\r\n");
//! # Ok::<(), mailwire_imap::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: lexers, builders and the command/response decoders
//! - [`types`]: command, response and parameter values and their serializers
//! - [`codec`]: `tokio_util` framing adapters
//! - [`config`]: token caps

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
mod error;
pub mod parser;
pub mod types;

pub use codec::{ClientCodec, ServerCodec};
pub use config::{DecoderConfig, DecoderConfigBuilder};
pub use error::{Error, Result};
pub use parser::{CommandDecoder, ResponseDecoder};
pub use types::{Command, LiteralChunk, Parameter, Response, ResponseCode, Status};
