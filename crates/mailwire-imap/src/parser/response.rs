//! Response decoder for tagged, untagged and continuation lines.

use bytes::{Buf, BytesMut};
use tracing::trace;

use super::builder::ResponseBuilder;
use super::lexer::{AtomLexer, LineLexer, ParameterLexer, Step, Terminator};
use crate::config::DecoderConfig;
use crate::types::{Response, Status};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Tag, `*`, or `+` for a continuation request.
    ReadTag,
    /// Status keyword, message number or data verb.
    Classify,
    /// Verb following a message number.
    ReadMessageVerb(u32),
    /// After the status keyword: `[` opens a response code.
    MaybeCode,
    ReadCodeName,
    ReadCodeParameters,
    /// After `]` or `+`: skip the space before the text.
    AfterCode,
    ReadText,
    ReadParameters,
}

/// Resumable decoder for server responses.
///
/// Classification follows the second token of the line: a number selects a
/// message-status response, a status keyword selects a status response with
/// optional response code and trailing text, and anything else is treated as
/// untagged server data.
#[derive(Debug)]
pub struct ResponseDecoder {
    state: State,
    atoms: AtomLexer,
    line: LineLexer,
    parameters: ParameterLexer,
    code_parameters: ParameterLexer,
    builder: ResponseBuilder,
}

impl ResponseDecoder {
    /// Creates a decoder with the default token caps.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Creates a decoder with custom token caps.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            state: State::ReadTag,
            atoms: AtomLexer::new(config.max_atom_len),
            line: LineLexer::new(config.max_text_len),
            parameters: ParameterLexer::line(config),
            code_parameters: ParameterLexer::code(config),
            builder: ResponseBuilder::new(),
        }
    }

    /// Decodes the next response from `buf`.
    ///
    /// Returns `Ok(None)` if `buf` ran out before the response was complete.
    ///
    /// # Errors
    ///
    /// Returns `FrameTooLong` or `CorruptedFrame` if the input can never form
    /// a valid response. The decoder must be reset before it is used again.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Response>> {
        loop {
            match self.state {
                State::ReadTag => {
                    if self.atoms.is_empty() && buf.first() == Some(&b'+') {
                        buf.advance(1);
                        self.builder.continuation();
                        self.state = State::AfterCode;
                        continue;
                    }
                    let Some(atom) = self.atoms.next(buf)? else {
                        return Ok(None);
                    };
                    if atom.terminator != Terminator::Space {
                        return Err(Error::corrupted("expected SP after tag"));
                    }
                    let tag = match atom.value.as_str() {
                        "" => return Err(Error::corrupted("empty tag")),
                        "*" => None,
                        _ => Some(atom.value),
                    };
                    self.builder.tag(tag);
                    self.state = State::Classify;
                }
                State::Classify => {
                    let Some(atom) = self.atoms.next(buf)? else {
                        return Ok(None);
                    };
                    if let Some(emitted) = self.classify(atom.value, atom.terminator)? {
                        return Ok(Some(emitted));
                    }
                }
                State::ReadMessageVerb(number) => {
                    let Some(atom) = self.atoms.next(buf)? else {
                        return Ok(None);
                    };
                    if atom.value.is_empty() {
                        return Err(Error::corrupted("missing verb after message number"));
                    }
                    self.builder.message_status(number, atom.value);
                    if atom.terminator == Terminator::Crlf {
                        return self.emit().map(Some);
                    }
                    self.state = State::ReadParameters;
                }
                State::MaybeCode => {
                    let Some(&byte) = buf.first() else {
                        return Ok(None);
                    };
                    if byte == b'[' {
                        buf.advance(1);
                        self.state = State::ReadCodeName;
                    } else {
                        self.state = State::ReadText;
                    }
                }
                State::ReadCodeName => {
                    let Some(atom) = self.atoms.next_code_name(buf)? else {
                        return Ok(None);
                    };
                    if atom.value.is_empty() {
                        return Err(Error::corrupted("empty response code"));
                    }
                    self.builder.code_name(atom.value);
                    self.state = match atom.terminator {
                        Terminator::CloseBracket => State::AfterCode,
                        Terminator::Space => State::ReadCodeParameters,
                        Terminator::Crlf => {
                            return Err(Error::corrupted("line ended inside response code"));
                        }
                    };
                }
                State::ReadCodeParameters => match self.code_parameters.step(buf)? {
                    Step::Parameter(param) => self.builder.push_code_parameter(param),
                    Step::Incomplete => return Ok(None),
                    Step::Ended => self.state = State::AfterCode,
                },
                State::AfterCode => {
                    let Some(&byte) = buf.first() else {
                        return Ok(None);
                    };
                    if byte == b' ' {
                        buf.advance(1);
                    }
                    self.state = State::ReadText;
                }
                State::ReadText => {
                    let Some(text) = self.line.next(buf)? else {
                        return Ok(None);
                    };
                    self.builder.text(text);
                    return self.emit().map(Some);
                }
                State::ReadParameters => match self.parameters.step(buf)? {
                    Step::Parameter(param) => self.builder.push(param),
                    Step::Incomplete => return Ok(None),
                    Step::Ended => return self.emit().map(Some),
                },
            }
        }
    }

    /// Decodes every complete response in `buf`.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed response; responses decoded before it are lost.
    pub fn decode_all(&mut self, buf: &mut BytesMut) -> Result<Vec<Response>> {
        let mut responses = Vec::new();
        while let Some(response) = self.decode(buf)? {
            responses.push(response);
        }
        Ok(responses)
    }

    /// Returns true if no part of a response has been consumed.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == State::ReadTag && self.atoms.is_empty()
    }

    /// Discards any partially decoded response.
    pub fn reset(&mut self) {
        self.state = State::ReadTag;
        self.atoms.reset();
        self.line.reset();
        self.parameters.reset();
        self.code_parameters.reset();
        self.builder.reset();
    }

    /// Picks the response kind from the token after the tag.
    fn classify(&mut self, token: String, terminator: Terminator) -> Result<Option<Response>> {
        if token.is_empty() {
            return Err(Error::corrupted("missing response keyword"));
        }

        if token.bytes().all(|b| b.is_ascii_digit()) {
            let number = token
                .parse()
                .map_err(|_| Error::corrupted(format!("message number out of range: {token}")))?;
            if terminator != Terminator::Space {
                return Err(Error::corrupted("missing verb after message number"));
            }
            self.state = State::ReadMessageVerb(number);
            return Ok(None);
        }

        if let Some(status) = Status::from_keyword(&token) {
            self.builder.status(status);
            if terminator == Terminator::Crlf {
                return self.emit().map(Some);
            }
            self.state = State::MaybeCode;
            return Ok(None);
        }

        self.builder.server(token);
        if terminator == Terminator::Crlf {
            return self.emit().map(Some);
        }
        self.state = State::ReadParameters;
        Ok(None)
    }

    fn emit(&mut self) -> Result<Response> {
        let response = self.builder.build()?;
        self.reset();
        trace!(
            tag = response.tag(),
            status = ?response.status(),
            "decoded response"
        );
        Ok(response)
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}
