//! Parameter lexer: atoms, numbers, NIL, quoted strings, literals and lists.

use bytes::{Buf, Bytes, BytesMut};

use super::{CR, LF, SP, is_ctl, push_capped, take_bytes, take_string};
use crate::config::DecoderConfig;
use crate::types::{LiteralChunk, Parameter};
use crate::{Error, Result};

/// Result of one lexer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A parameter was decoded.
    Parameter(Parameter),
    /// The buffer ran out; call again with more bytes.
    Incomplete,
    /// The parameter sequence is over (end of line, or `]` for response codes).
    Ended,
}

/// Size bookkeeping for the literal being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralLength {
    declared: u32,
    remaining: u32,
    non_synchronizing: bool,
}

impl LiteralLength {
    const fn new(declared: u32, non_synchronizing: bool) -> Self {
        Self {
            declared,
            remaining: declared,
            non_synchronizing,
        }
    }

    /// Octet count announced in `{n}`.
    #[must_use]
    pub const fn declared(&self) -> u32 {
        self.declared
    }

    /// Octets still to be read.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True for `{n+}`.
    #[must_use]
    pub const fn is_non_synchronizing(&self) -> bool {
        self.non_synchronizing
    }
}

/// What ends the parameter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Parameters up to CRLF.
    Line,
    /// Response-code parameters up to `]`.
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// After a parameter: expect SP, `)` or the end of the sequence.
    Next,
    /// Before a parameter: dispatch on its first byte.
    Empty,
    ReadAtom,
    ReadQuotedString,
    ReadLiteralLength,
    /// After `}`: skip an optional CRLF before the payload.
    LiteralSeparator(LiteralLength),
    ReadLiteral(LiteralLength),
    Ended,
}

/// Resumable lexer for the parameters following a verb or response-code name.
///
/// Lists are reported flat, as `OpenList` and `CloseList` markers. Literal
/// payloads are handed out as they arrive; every chunk but the last of a
/// literal is marked partial.
#[derive(Debug)]
pub struct ParameterLexer {
    state: State,
    mode: Mode,
    config: DecoderConfig,
    scratch: Vec<u8>,
    depth: usize,
    pending_cr: bool,
    escaped: bool,
    in_section: bool,
    plus: bool,
}

impl ParameterLexer {
    /// Creates a lexer for parameters terminated by CRLF.
    #[must_use]
    pub fn line(config: DecoderConfig) -> Self {
        Self::new(Mode::Line, config)
    }

    /// Creates a lexer for response-code parameters terminated by `]`.
    #[must_use]
    pub fn code(config: DecoderConfig) -> Self {
        Self::new(Mode::Code, config)
    }

    fn new(mode: Mode, config: DecoderConfig) -> Self {
        Self {
            state: State::Empty,
            mode,
            config,
            scratch: Vec::with_capacity(config.max_atom_len.min(128)),
            depth: 0,
            pending_cr: false,
            escaped: false,
            in_section: false,
            plus: false,
        }
    }

    /// Returns true once the end of the parameter sequence was consumed.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state == State::Ended
    }

    /// Returns true if the lexer has not consumed anything since the last reset.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == State::Empty && self.depth == 0 && self.scratch.is_empty()
    }

    /// Returns the literal currently being read, if any.
    #[must_use]
    pub const fn literal(&self) -> Option<&LiteralLength> {
        match &self.state {
            State::LiteralSeparator(literal) | State::ReadLiteral(literal) => Some(literal),
            _ => None,
        }
    }

    /// Returns to the initial state, discarding any partial token.
    pub fn reset(&mut self) {
        self.state = State::Empty;
        self.scratch.clear();
        self.depth = 0;
        self.pending_cr = false;
        self.escaped = false;
        self.in_section = false;
        self.plus = false;
    }

    /// Advances the lexer over `buf`.
    ///
    /// Consumed bytes are removed from the front of `buf`. After `Ended` is
    /// returned the lexer keeps returning `Ended` until it is reset.
    pub fn step(&mut self, buf: &mut BytesMut) -> Result<Step> {
        loop {
            match self.state {
                State::Ended => return Ok(Step::Ended),
                State::Next => {
                    let Some(&byte) = buf.first() else {
                        return Ok(Step::Incomplete);
                    };
                    self.next_separator(buf, byte)?;
                }
                State::Empty => {
                    let Some(&byte) = buf.first() else {
                        return Ok(Step::Incomplete);
                    };
                    if let Some(param) = self.dispatch(buf, byte)? {
                        return Ok(Step::Parameter(param));
                    }
                }
                State::ReadAtom => return self.read_atom(buf),
                State::ReadQuotedString => return self.read_quoted_string(buf),
                State::ReadLiteralLength => {
                    if !self.read_literal_length(buf)? {
                        return Ok(Step::Incomplete);
                    }
                }
                State::LiteralSeparator(literal) => match (buf.first(), buf.get(1)) {
                    (None, _) | (Some(&CR), None) => return Ok(Step::Incomplete),
                    (Some(&CR), Some(&LF)) => {
                        buf.advance(2);
                        self.state = State::ReadLiteral(literal);
                    }
                    _ => self.state = State::ReadLiteral(literal),
                },
                State::ReadLiteral(literal) => return Ok(self.read_literal(buf, literal)),
            }
        }
    }

    /// Handles the byte following a complete parameter.
    fn next_separator(&mut self, buf: &mut BytesMut, byte: u8) -> Result<()> {
        if self.pending_cr {
            self.pending_cr = false;
            if byte == LF {
                buf.advance(1);
                return self.end();
            }
            // The CR was not part of a line end; drop it and look at `byte`.
        }

        match (byte, self.mode) {
            (SP, _) => {
                buf.advance(1);
                self.state = State::Empty;
            }
            (CR, Mode::Line) => {
                buf.advance(1);
                self.pending_cr = true;
            }
            (LF, Mode::Line) | (b']', Mode::Code) => {
                buf.advance(1);
                return self.end();
            }
            // Left in place so that `Empty` emits the CloseList.
            (b')', _) => self.state = State::Empty,
            (CR | LF, Mode::Code) => {
                return Err(Error::corrupted("line ended inside response code"));
            }
            _ => {
                return Err(Error::corrupted(format!(
                    "unexpected byte {byte:#04x} after parameter"
                )));
            }
        }
        Ok(())
    }

    /// Classifies the first byte of a parameter.
    fn dispatch(&mut self, buf: &mut BytesMut, byte: u8) -> Result<Option<Parameter>> {
        match byte {
            b'"' => {
                buf.advance(1);
                self.state = State::ReadQuotedString;
            }
            b'{' => {
                buf.advance(1);
                self.state = State::ReadLiteralLength;
            }
            b'(' => {
                buf.advance(1);
                self.depth += 1;
                return Ok(Some(Parameter::OpenList));
            }
            b')' => {
                if self.depth == 0 {
                    return Err(Error::corrupted("unbalanced ')'"));
                }
                buf.advance(1);
                self.depth -= 1;
                self.state = State::Next;
                return Ok(Some(Parameter::CloseList));
            }
            SP => buf.advance(1),
            CR | LF => self.state = State::Next,
            b']' if self.mode == Mode::Code => self.state = State::Next,
            _ => self.state = State::ReadAtom,
        }
        Ok(None)
    }

    fn end(&mut self) -> Result<()> {
        if self.depth > 0 {
            return Err(Error::corrupted("unterminated list"));
        }
        self.state = State::Ended;
        Ok(())
    }

    fn read_atom(&mut self, buf: &mut BytesMut) -> Result<Step> {
        let mut consumed = 0;
        let mut complete = false;

        for &byte in buf.iter() {
            if self.in_section {
                match byte {
                    CR | LF => return Err(Error::corrupted("line ended inside section")),
                    b']' => self.in_section = false,
                    _ => {}
                }
            } else {
                match (byte, self.mode) {
                    (SP | CR | LF | b')', _) | (b']', Mode::Code) => {
                        complete = true;
                        break;
                    }
                    (b'[', Mode::Line) => self.in_section = true,
                    _ => {}
                }
            }

            if is_ctl(byte) {
                return Err(Error::corrupted(format!(
                    "illegal byte {byte:#04x} in atom"
                )));
            }
            push_capped(&mut self.scratch, byte, self.config.max_atom_len, "atom")?;
            consumed += 1;
        }

        buf.advance(consumed);

        if !complete {
            return Ok(Step::Incomplete);
        }

        let token = take_string(&mut self.scratch, "atom")?;
        self.state = State::Next;
        Parameter::from_token(token).map(Step::Parameter)
    }

    fn read_quoted_string(&mut self, buf: &mut BytesMut) -> Result<Step> {
        let limit = self.config.max_quoted_len;
        let mut consumed = 0;
        let mut complete = false;

        for &byte in buf.iter() {
            consumed += 1;

            if self.escaped {
                if byte != b'"' && byte != b'\\' {
                    return Err(Error::corrupted(format!("invalid escape {byte:#04x}")));
                }
                self.escaped = false;
                push_capped(&mut self.scratch, byte, limit, "quoted string")?;
                continue;
            }

            match byte {
                b'"' => {
                    complete = true;
                    break;
                }
                b'\\' => self.escaped = true,
                CR | LF => return Err(Error::corrupted("line ended inside quoted string")),
                _ => push_capped(&mut self.scratch, byte, limit, "quoted string")?,
            }
        }

        buf.advance(consumed);

        if !complete {
            return Ok(Step::Incomplete);
        }

        let value = take_bytes(&mut self.scratch);
        self.state = State::Next;
        Ok(Step::Parameter(Parameter::QuotedString(value)))
    }

    /// Reads `<digits>[+]}`. Returns false if more input is needed.
    fn read_literal_length(&mut self, buf: &mut BytesMut) -> Result<bool> {
        let limit = self.config.max_atom_len;
        let mut consumed = 0;
        let mut complete = false;

        for &byte in buf.iter() {
            consumed += 1;
            match byte {
                b'0'..=b'9' if !self.plus => {
                    push_capped(&mut self.scratch, byte, limit, "literal length")?;
                }
                b'+' if !self.plus && !self.scratch.is_empty() => self.plus = true,
                b'}' => {
                    complete = true;
                    break;
                }
                _ => {
                    return Err(Error::corrupted(format!(
                        "unexpected byte {byte:#04x} in literal length"
                    )));
                }
            }
        }

        buf.advance(consumed);

        if !complete {
            return Ok(false);
        }

        let digits = take_string(&mut self.scratch, "literal length")?;
        if digits.is_empty() {
            return Err(Error::corrupted("empty literal length"));
        }

        let max = self.config.max_literal_len;
        let declared = digits
            .parse::<u64>()
            .ok()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n <= max)
            .ok_or_else(|| Error::too_long("literal", max as usize))?;

        self.state = State::LiteralSeparator(LiteralLength::new(declared, self.plus));
        self.plus = false;
        Ok(true)
    }

    fn read_literal(&mut self, buf: &mut BytesMut, mut literal: LiteralLength) -> Step {
        if literal.remaining > 0 && buf.is_empty() {
            return Step::Incomplete;
        }

        let available = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let take = literal.remaining.min(available);
        let data: Bytes = buf.split_to(take as usize).freeze();
        literal.remaining -= take;

        let partial = literal.remaining > 0;
        self.state = if partial {
            State::ReadLiteral(literal)
        } else {
            State::Next
        };

        Step::Parameter(Parameter::Chunk(LiteralChunk {
            data,
            partial,
            non_synchronizing: literal.non_synchronizing,
        }))
    }
}
