//! Resumable IMAP lexers.
//!
//! Every lexer consumes bytes from the front of a `BytesMut` as it scans and
//! keeps the bytes of an unfinished token in its own scratch buffer. When the
//! input runs out mid-token it reports "need more input" and the next call
//! continues where the previous one stopped, so the output does not depend on
//! how the stream was fragmented.

mod atom;
mod line;
mod parameter;

pub use atom::{Atom, AtomLexer, Terminator};
pub use line::LineLexer;
pub use parameter::{LiteralLength, ParameterLexer, Step};

use bytes::Bytes;

use crate::{Error, Result};

pub(crate) const SP: u8 = b' ';
pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';

/// Returns true for ASCII control characters.
const fn is_ctl(b: u8) -> bool {
    b < 0x20 || b == 0x7F
}

/// Appends a byte to a capped scratch buffer.
fn push_capped(scratch: &mut Vec<u8>, byte: u8, limit: usize, token: &'static str) -> Result<()> {
    if scratch.len() >= limit {
        return Err(Error::too_long(token, limit));
    }
    scratch.push(byte);
    Ok(())
}

/// Copies the scratch buffer out as a string and clears it for the next token.
///
/// Only used for atoms, which the grammar restricts to 7-bit characters.
fn take_string(scratch: &mut Vec<u8>, token: &'static str) -> Result<String> {
    let value = std::str::from_utf8(scratch)
        .map_err(|_| Error::corrupted(format!("invalid UTF-8 in {token}")))?
        .to_owned();
    scratch.clear();
    Ok(value)
}

/// Copies the scratch buffer out unchanged and clears it for the next token.
fn take_bytes(scratch: &mut Vec<u8>) -> Bytes {
    let value = Bytes::copy_from_slice(scratch);
    scratch.clear();
    value
}
