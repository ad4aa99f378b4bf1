//! Wire serialization for parameters, commands and responses.
//!
//! `write` produces the line without its terminator; `encode` appends CRLF.

use bytes::BufMut;

use super::parameter::is_quotable;
use super::{Command, LiteralChunk, Parameter, Response, ResponseCode, Status};

const CRLF: &[u8] = b"\r\n";

impl Parameter {
    /// Writes the parameter. A chunk is written as a complete literal.
    ///
    /// Text is written as a quoted string, or as a literal if it holds a line
    /// break or is longer than a decoder accepts in quotes.
    pub fn write<B: BufMut>(&self, buf: &mut B) {
        match self {
            Self::Atom(s) => buf.put_slice(s.as_bytes()),
            Self::Number(n) => buf.put_slice(n.to_string().as_bytes()),
            Self::Nil => buf.put_slice(b"NIL"),
            Self::QuotedString(s) => write_quoted(buf, s),
            Self::Text(s) if is_quotable(s) => write_quoted(buf, s),
            Self::Text(s) => {
                write_literal_header(buf, s.len(), false);
                buf.put_slice(s);
            }
            Self::OpenList => buf.put_u8(b'('),
            Self::CloseList => buf.put_u8(b')'),
            Self::Chunk(chunk) => {
                write_literal_header(buf, chunk.len(), chunk.non_synchronizing);
                buf.put_slice(&chunk.data);
            }
        }
    }
}

/// Writes a parameter sequence, each preceded by a single space.
///
/// The space is left out right after `(`, right before `)`, and between a
/// partial literal chunk and its continuation. A literal header is written
/// once per literal, covering all of its chunks.
pub fn write_parameters<B: BufMut>(buf: &mut B, parameters: &[Parameter]) {
    let mut previous: Option<&Parameter> = None;

    for (i, param) in parameters.iter().enumerate() {
        let continues_literal =
            previous.is_some_and(Parameter::is_partial) && matches!(param, Parameter::Chunk(_));

        let separate = match previous {
            None => true,
            Some(Parameter::OpenList) => false,
            Some(_) => !matches!(param, Parameter::CloseList) && !continues_literal,
        };
        if separate {
            buf.put_u8(b' ');
        }

        match param {
            Parameter::Chunk(chunk) => {
                if !continues_literal {
                    let len = literal_len(&parameters[i..]);
                    write_literal_header(buf, len, chunk.non_synchronizing);
                }
                buf.put_slice(&chunk.data);
            }
            other => other.write(buf),
        }

        previous = Some(param);
    }
}

/// Total octets of the literal starting at `run[0]`.
fn literal_len(run: &[Parameter]) -> usize {
    let mut total = 0;
    for param in run {
        let Parameter::Chunk(LiteralChunk { data, partial, .. }) = param else {
            break;
        };
        total += data.len();
        if !partial {
            break;
        }
    }
    total
}

fn write_literal_header<B: BufMut>(buf: &mut B, len: usize, non_synchronizing: bool) {
    buf.put_u8(b'{');
    buf.put_slice(len.to_string().as_bytes());
    if non_synchronizing {
        buf.put_u8(b'+');
    }
    buf.put_u8(b'}');
    buf.put_slice(CRLF);
}

fn write_quoted<B: BufMut>(buf: &mut B, s: &[u8]) {
    buf.put_u8(b'"');
    for &b in s {
        if b == b'"' || b == b'\\' {
            buf.put_u8(b'\\');
        }
        buf.put_u8(b);
    }
    buf.put_u8(b'"');
}

impl ResponseCode {
    /// Writes `[NAME params]`.
    pub fn write<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(b'[');
        buf.put_slice(self.name.as_bytes());
        write_parameters(buf, &self.parameters);
        buf.put_u8(b']');
    }
}

impl Command {
    /// Writes the command line without CRLF.
    pub fn write<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self.tag().as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(self.verb().as_bytes());
        write_parameters(buf, self.parameters());
    }

    /// Writes the command line followed by CRLF.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        self.write(buf);
        buf.put_slice(CRLF);
    }

    /// Serializes the command to bytes, CRLF included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

impl Response {
    /// Writes the response line without CRLF.
    pub fn write<B: BufMut>(&self, buf: &mut B) {
        match self {
            Self::Ok { tag, code, text } => {
                write_status(buf, tag.as_deref(), Status::Ok, code.as_ref(), text);
            }
            Self::No { tag, code, text } => {
                write_status(buf, tag.as_deref(), Status::No, code.as_ref(), text);
            }
            Self::Bad { tag, code, text } => {
                write_status(buf, tag.as_deref(), Status::Bad, code.as_ref(), text);
            }
            Self::PreAuth { code, text } => {
                write_status(buf, None, Status::PreAuth, code.as_ref(), text);
            }
            Self::Bye { code, text } => {
                write_status(buf, None, Status::Bye, code.as_ref(), text);
            }
            Self::Server { verb, parameters } => {
                buf.put_slice(b"* ");
                buf.put_slice(verb.as_bytes());
                write_parameters(buf, parameters);
            }
            Self::MessageStatus {
                number,
                verb,
                parameters,
            } => {
                buf.put_slice(b"* ");
                buf.put_slice(number.to_string().as_bytes());
                buf.put_u8(b' ');
                buf.put_slice(verb.as_bytes());
                write_parameters(buf, parameters);
            }
            Self::Continuation { text } => {
                buf.put_u8(b'+');
                if !text.is_empty() {
                    buf.put_u8(b' ');
                    buf.put_slice(text);
                }
            }
        }
    }

    /// Writes the response line followed by CRLF.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        self.write(buf);
        buf.put_slice(CRLF);
    }

    /// Serializes the response to bytes, CRLF included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

fn write_status<B: BufMut>(
    buf: &mut B,
    tag: Option<&str>,
    status: Status,
    code: Option<&ResponseCode>,
    text: &[u8],
) {
    match tag {
        Some(tag) => buf.put_slice(tag.as_bytes()),
        None => buf.put_u8(b'*'),
    }
    buf.put_u8(b' ');
    buf.put_slice(status.as_str().as_bytes());

    if let Some(code) = code {
        buf.put_u8(b' ');
        code.write(buf);
    }
    if !text.is_empty() {
        buf.put_u8(b' ');
        buf.put_slice(text);
    }
}
