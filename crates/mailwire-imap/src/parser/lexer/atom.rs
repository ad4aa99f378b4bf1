//! Atom lexer for tags, verbs and response-code names.

use bytes::{Buf, BytesMut};

use super::{CR, LF, SP, is_ctl, push_capped, take_string};
use crate::{Error, Result};

/// How an atom was terminated. The terminator byte is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// A single space.
    Space,
    /// End of line (CRLF, or a bare LF).
    Crlf,
    /// `]`, only recognized when reading a response-code name.
    CloseBracket,
}

/// A complete atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Token text.
    pub value: String,
    /// How the token ended.
    pub terminator: Terminator,
}

/// Tokenizes the next whitespace or CRLF delimited identifier.
#[derive(Debug)]
pub struct AtomLexer {
    scratch: Vec<u8>,
    limit: usize,
    pending_cr: bool,
}

impl AtomLexer {
    /// Creates a lexer that fails once a token exceeds `limit` bytes.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            scratch: Vec::with_capacity(limit.min(128)),
            limit,
            pending_cr: false,
        }
    }

    /// Reads an atom terminated by SP or CRLF.
    ///
    /// Returns `Ok(None)` if the buffer ran out first; the partial token is kept.
    pub fn next(&mut self, buf: &mut BytesMut) -> Result<Option<Atom>> {
        self.scan(buf, false)
    }

    /// Reads a response-code name, which may also be terminated by `]`.
    pub fn next_code_name(&mut self, buf: &mut BytesMut) -> Result<Option<Atom>> {
        self.scan(buf, true)
    }

    /// Returns true if no partial token is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scratch.is_empty() && !self.pending_cr
    }

    /// Discards any partial token.
    pub fn reset(&mut self) {
        self.scratch.clear();
        self.pending_cr = false;
    }

    fn scan(&mut self, buf: &mut BytesMut, close_bracket: bool) -> Result<Option<Atom>> {
        let mut consumed = 0;
        let mut terminator = None;

        for &byte in buf.iter() {
            consumed += 1;

            if self.pending_cr {
                self.pending_cr = false;
                if byte == LF {
                    terminator = Some(Terminator::Crlf);
                    break;
                }
                // A CR that does not start CRLF is dropped.
            }

            match byte {
                SP => {
                    terminator = Some(Terminator::Space);
                    break;
                }
                LF => {
                    terminator = Some(Terminator::Crlf);
                    break;
                }
                b']' if close_bracket => {
                    terminator = Some(Terminator::CloseBracket);
                    break;
                }
                CR => self.pending_cr = true,
                _ if is_ctl(byte) => {
                    return Err(Error::corrupted(format!(
                        "illegal byte {byte:#04x} in atom"
                    )));
                }
                _ => push_capped(&mut self.scratch, byte, self.limit, "atom")?,
            }
        }

        buf.advance(consumed);

        let Some(terminator) = terminator else {
            return Ok(None);
        };

        let value = take_string(&mut self.scratch, "atom")?;
        Ok(Some(Atom { value, terminator }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_space_terminated() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&b"ZZ01 BLURYBLOOP\r\n"[..]);

        let atom = lexer.next(&mut buf).unwrap().unwrap();
        assert_eq!(atom.value, "ZZ01");
        assert_eq!(atom.terminator, Terminator::Space);
        assert_eq!(&buf[..], b"BLURYBLOOP\r\n");

        let atom = lexer.next(&mut buf).unwrap().unwrap();
        assert_eq!(atom.value, "BLURYBLOOP");
        assert_eq!(atom.terminator, Terminator::Crlf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_resumes_partial_token() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&b"BLURY"[..]);

        assert_eq!(lexer.next(&mut buf).unwrap(), None);
        assert!(buf.is_empty());
        assert!(!lexer.is_empty());

        buf.extend_from_slice(b"BLOOP\r");
        assert_eq!(lexer.next(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"\nNEXT");
        let atom = lexer.next(&mut buf).unwrap().unwrap();
        assert_eq!(atom.value, "BLURYBLOOP");
        assert_eq!(atom.terminator, Terminator::Crlf);
        assert_eq!(&buf[..], b"NEXT");
        assert!(lexer.is_empty());
    }

    #[test]
    fn test_code_name_bracket() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&b"ALERT] text"[..]);

        let atom = lexer.next_code_name(&mut buf).unwrap().unwrap();
        assert_eq!(atom.value, "ALERT");
        assert_eq!(atom.terminator, Terminator::CloseBracket);
        assert_eq!(&buf[..], b" text");
    }

    #[test]
    fn test_bracket_is_plain_byte_outside_codes() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&b"A]B "[..]);
        assert_eq!(lexer.next(&mut buf).unwrap().unwrap().value, "A]B");
    }

    #[test]
    fn test_too_long() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&[b'A'; 128][..]);
        assert_eq!(lexer.next(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"A");
        let err = lexer.next(&mut buf).unwrap_err();
        assert!(matches!(err, Error::FrameTooLong { limit: 128, .. }));
    }

    #[test]
    fn test_lone_cr_is_dropped() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&b"NO\rOP\r"[..]);
        assert_eq!(lexer.next(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"\r\n");
        let atom = lexer.next(&mut buf).unwrap().unwrap();
        assert_eq!(atom.value, "NOOP");
        assert_eq!(atom.terminator, Terminator::Crlf);
        assert!(lexer.is_empty());
    }

    #[test]
    fn test_non_utf8_atom() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&b"Bo\xeete "[..]);
        assert!(matches!(
            lexer.next(&mut buf),
            Err(Error::CorruptedFrame { .. })
        ));
    }

    #[test]
    fn test_control_byte() {
        let mut lexer = AtomLexer::new(128);
        let mut buf = BytesMut::from(&b"A\x00B "[..]);
        assert!(matches!(
            lexer.next(&mut buf),
            Err(Error::CorruptedFrame { .. })
        ));
    }
}
