//! Command decoder: `tag SP verb *(SP parameter) CRLF`.

use bytes::BytesMut;
use tracing::trace;

use super::builder::CommandBuilder;
use super::lexer::{AtomLexer, ParameterLexer, Step, Terminator};
use crate::config::DecoderConfig;
use crate::types::Command;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadTag,
    ReadVerb,
    ReadParameters,
}

/// Resumable decoder for client commands.
///
/// One instance serves one connection direction. Each call to
/// [`decode`](Self::decode) consumes as many bytes as it can; progress on an
/// unfinished command is kept for the next call.
///
/// # Example
///
/// ```
/// use bytes::BytesMut;
/// use mailwire_imap::CommandDecoder;
///
/// let mut decoder = CommandDecoder::new();
/// let mut buf = BytesMut::from(&b"ZZ01 BLURYBLOO"[..]);
/// assert!(decoder.decode(&mut buf)?.is_none());
///
/// buf.extend_from_slice(b"P\r\n");
/// let command = decoder.decode(&mut buf)?.expect("complete command");
/// assert_eq!(command.tag(), "ZZ01");
/// assert_eq!(command.verb(), "BLURYBLOOP");
/// # Ok::<(), mailwire_imap::Error>(())
/// ```
#[derive(Debug)]
pub struct CommandDecoder {
    state: State,
    atoms: AtomLexer,
    parameters: ParameterLexer,
    builder: CommandBuilder,
}

impl CommandDecoder {
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
            parameters: ParameterLexer::line(config),
            builder: CommandBuilder::new(),
        }
    }

    /// Decodes the next command from `buf`.
    ///
    /// Returns `Ok(None)` if `buf` ran out before the command was complete.
    ///
    /// # Errors
    ///
    /// Returns `FrameTooLong` or `CorruptedFrame` if the input can never form
    /// a valid command. The decoder must be reset before it is used again.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Command>> {
        loop {
            match self.state {
                State::ReadTag => {
                    let Some(atom) = self.atoms.next(buf)? else {
                        return Ok(None);
                    };
                    if atom.terminator != Terminator::Space {
                        return Err(Error::corrupted("expected SP after tag"));
                    }
                    if atom.value.is_empty() {
                        return Err(Error::corrupted("empty tag"));
                    }
                    self.builder.tag(atom.value);
                    self.state = State::ReadVerb;
                }
                State::ReadVerb => {
                    let Some(atom) = self.atoms.next(buf)? else {
                        return Ok(None);
                    };
                    if atom.value.is_empty() {
                        return Err(Error::corrupted("empty verb"));
                    }
                    self.builder.verb(atom.value);
                    if atom.terminator == Terminator::Crlf {
                        return self.emit().map(Some);
                    }
                    self.state = State::ReadParameters;
                }
                State::ReadParameters => match self.parameters.step(buf)? {
                    Step::Parameter(param) => self.builder.push(param),
                    Step::Incomplete => return Ok(None),
                    Step::Ended => return self.emit().map(Some),
                },
            }
        }
    }

    /// Decodes every complete command in `buf`.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed command; commands decoded before it are lost.
    pub fn decode_all(&mut self, buf: &mut BytesMut) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        while let Some(command) = self.decode(buf)? {
            commands.push(command);
        }
        Ok(commands)
    }

    /// Returns true if no part of a command has been consumed.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == State::ReadTag && self.atoms.is_empty()
    }

    /// Discards any partially decoded command.
    pub fn reset(&mut self) {
        self.state = State::ReadTag;
        self.atoms.reset();
        self.parameters.reset();
        self.builder.reset();
    }

    fn emit(&mut self) -> Result<Command> {
        let command = self.builder.build()?;
        self.reset();
        trace!(
            tag = command.tag(),
            verb = command.verb(),
            parameters = command.parameters().len(),
            "decoded command"
        );
        Ok(command)
    }
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self::new()
    }
}
