//! `tokio_util` codecs for the two sides of an IMAP connection.
//!
//! [`ServerCodec`] reads commands and writes responses; [`ClientCodec`] reads
//! responses and writes commands. Both wrap the streaming decoders, so they
//! can be used with `FramedRead`, `FramedWrite` or `Framed`.

use std::io;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::config::DecoderConfig;
use crate::parser::{CommandDecoder, ResponseDecoder};
use crate::types::{Command, Response};
use crate::{Error, Result};

/// Server side of a connection: decodes commands, encodes responses.
#[derive(Debug, Default)]
pub struct ServerCodec {
    decoder: CommandDecoder,
}

impl ServerCodec {
    /// Creates a codec with the default token caps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom token caps.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            decoder: CommandDecoder::with_config(config),
        }
    }
}

impl Decoder for ServerCodec {
    type Item = Command;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Command>> {
        self.decoder.decode(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Command>> {
        match self.decoder.decode(src)? {
            Some(command) => Ok(Some(command)),
            None if src.is_empty() && self.decoder.is_idle() => Ok(None),
            None => Err(unexpected_eof()),
        }
    }
}

impl Encoder<Response> for ServerCodec {
    type Error = Error;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<()> {
        item.encode(dst);
        Ok(())
    }
}

/// Client side of a connection: decodes responses, encodes commands.
#[derive(Debug, Default)]
pub struct ClientCodec {
    decoder: ResponseDecoder,
}

impl ClientCodec {
    /// Creates a codec with the default token caps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom token caps.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            decoder: ResponseDecoder::with_config(config),
        }
    }
}

impl Decoder for ClientCodec {
    type Item = Response;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Response>> {
        self.decoder.decode(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Response>> {
        match self.decoder.decode(src)? {
            Some(response) => Ok(Some(response)),
            None if src.is_empty() && self.decoder.is_idle() => Ok(None),
            None => Err(unexpected_eof()),
        }
    }
}

impl Encoder<Command> for ClientCodec {
    type Error = Error;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<()> {
        item.encode(dst);
        Ok(())
    }
}

fn unexpected_eof() -> Error {
    debug!("stream closed in the middle of a message");
    Error::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed mid-message",
    ))
}
