//! Line lexer for trailing human-readable text.

use bytes::{Buf, Bytes, BytesMut};

use super::{CR, LF, push_capped, take_bytes};
use crate::Result;

/// Collects everything, spaces included, up to CRLF.
///
/// The text is kept as raw octets, so 8-bit greetings survive unchanged.
#[derive(Debug)]
pub struct LineLexer {
    scratch: Vec<u8>,
    limit: usize,
    pending_cr: bool,
}

impl LineLexer {
    /// Creates a lexer that fails once the text exceeds `limit` bytes.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            scratch: Vec::with_capacity(limit.min(512)),
            limit,
            pending_cr: false,
        }
    }

    /// Reads the rest of the line. The CRLF is consumed and not returned.
    pub fn next(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>> {
        let mut consumed = 0;
        let mut complete = false;

        for &byte in buf.iter() {
            consumed += 1;

            if self.pending_cr {
                self.pending_cr = false;
                if byte == LF {
                    complete = true;
                    break;
                }
            }

            match byte {
                LF => {
                    complete = true;
                    break;
                }
                CR => self.pending_cr = true,
                _ => push_capped(&mut self.scratch, byte, self.limit, "text")?,
            }
        }

        buf.advance(consumed);

        if !complete {
            return Ok(None);
        }

        Ok(Some(take_bytes(&mut self.scratch)))
    }

    /// Returns true if no partial line is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scratch.is_empty() && !self.pending_cr
    }

    /// Discards any partial line.
    pub fn reset(&mut self) {
        self.scratch.clear();
        self.pending_cr = false;
    }
}
