//! Command and response parameters.

use bytes::Bytes;

use crate::config::DEFAULT_MAX_QUOTED_LEN;
use crate::{Error, Result};

/// A single lexical parameter of a command or response line.
///
/// Lists are flattened: `(A B)` becomes `OpenList, Atom("A"), Atom("B"), CloseList`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Unquoted token.
    Atom(String),
    /// Token made only of ASCII digits.
    Number(u64),
    /// The `NIL` token.
    Nil,
    /// Quoted string, unescaped. The octets are kept as sent.
    QuotedString(Bytes),
    /// Opening parenthesis of a list.
    OpenList,
    /// Closing parenthesis of a list.
    CloseList,
    /// Literal payload, or a piece of one.
    Chunk(LiteralChunk),
    /// Human-readable text.
    ///
    /// Text has no token of its own inside a parameter list. It goes on the
    /// wire as a quoted string, or as a literal when it cannot be quoted, and
    /// the constructors of commands and responses store it in that form.
    Text(Bytes),
}

impl Parameter {
    /// Creates an atom parameter.
    #[must_use]
    pub fn atom(value: impl Into<String>) -> Self {
        Self::Atom(value.into())
    }

    /// Creates a quoted-string parameter.
    #[must_use]
    pub fn quoted(value: impl Into<Bytes>) -> Self {
        Self::QuotedString(value.into())
    }

    /// Creates a complete synchronizing literal (`{n}`).
    #[must_use]
    pub fn literal(data: impl Into<Bytes>) -> Self {
        Self::Chunk(LiteralChunk::complete(data, false))
    }

    /// Creates a complete non-synchronizing literal (`{n+}`).
    #[must_use]
    pub fn literal_plus(data: impl Into<Bytes>) -> Self {
        Self::Chunk(LiteralChunk::complete(data, true))
    }

    /// Creates a human-readable text parameter.
    #[must_use]
    pub fn text(value: impl Into<Bytes>) -> Self {
        Self::Text(value.into())
    }

    /// Classifies a raw unquoted token.
    ///
    /// A token made only of digits is always a number, even if the sender meant
    /// it as an atom. `NIL` is matched exactly, so `nil` stays an atom.
    pub(crate) fn from_token(token: String) -> Result<Self> {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            let n = token
                .parse()
                .map_err(|_| Error::corrupted(format!("number out of range: {token}")))?;
            Ok(Self::Number(n))
        } else if token == "NIL" {
            Ok(Self::Nil)
        } else {
            Ok(Self::Atom(token))
        }
    }

    /// Replaces `Text` with the parameter it is written as.
    ///
    /// Every other variant is returned unchanged.
    #[must_use]
    pub fn into_wire_form(self) -> Self {
        match self {
            Self::Text(text) if is_quotable(&text) => Self::QuotedString(text),
            Self::Text(text) => Self::literal(text),
            other => other,
        }
    }

    /// Returns true if this is a literal chunk with more data to follow.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::Chunk(chunk) if chunk.partial)
    }

    /// Returns the atom value, if this is an atom.
    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(s) => Some(s),
            _ => None,
        }
    }
}

/// Applies [`Parameter::into_wire_form`] to a whole sequence.
pub(crate) fn wire_parameters(parameters: Vec<Parameter>) -> Vec<Parameter> {
    parameters
        .into_iter()
        .map(Parameter::into_wire_form)
        .collect()
}

/// True if `value` fits a quoted string that a default decoder accepts.
pub(crate) fn is_quotable(value: &[u8]) -> bool {
    value.len() <= DEFAULT_MAX_QUOTED_LEN && !value.iter().any(|&b| b == b'\r' || b == b'\n')
}

/// A run of literal octets.
///
/// The decoder hands out literal payloads as they arrive; a chunk is
/// `partial` while more octets of the same literal are still expected.
/// Completed commands and responses always hold each literal as a single
/// non-partial chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralChunk {
    /// Raw octets, binary safe.
    pub data: Bytes,
    /// More octets of this literal follow.
    pub partial: bool,
    /// Declared as `{n+}` (LITERAL+).
    pub non_synchronizing: bool,
}

impl LiteralChunk {
    /// Creates a complete literal.
    #[must_use]
    pub fn complete(data: impl Into<Bytes>, non_synchronizing: bool) -> Self {
        Self {
            data: data.into(),
            partial: false,
            non_synchronizing,
        }
    }

    /// Returns the number of octets in this chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk carries no octets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_number() {
        assert_eq!(
            Parameter::from_token("12".into()).unwrap(),
            Parameter::Number(12)
        );
        assert_eq!(
            Parameter::from_token("34567890".into()).unwrap(),
            Parameter::Number(34_567_890)
        );
    }

    #[test]
    fn test_from_token_nil() {
        assert_eq!(Parameter::from_token("NIL".into()).unwrap(), Parameter::Nil);
        assert_eq!(
            Parameter::from_token("nil".into()).unwrap(),
            Parameter::atom("nil")
        );
        assert_eq!(
            Parameter::from_token("NUL".into()).unwrap(),
            Parameter::atom("NUL")
        );
    }

    #[test]
    fn test_from_token_mixed_is_atom() {
        assert_eq!(
            Parameter::from_token("1:5".into()).unwrap(),
            Parameter::atom("1:5")
        );
        assert_eq!(
            Parameter::from_token("12abc".into()).unwrap(),
            Parameter::atom("12abc")
        );
    }

    #[test]
    fn test_from_token_overflow() {
        let err = Parameter::from_token("99999999999999999999999".into()).unwrap_err();
        assert!(matches!(err, Error::CorruptedFrame { .. }));
    }

    #[test]
    fn test_text_wire_form() {
        assert_eq!(
            Parameter::text("hello world").into_wire_form(),
            Parameter::quoted("hello world")
        );
        assert_eq!(
            Parameter::text("two\r\nlines").into_wire_form(),
            Parameter::literal("two\r\nlines")
        );
        assert_eq!(
            Parameter::text(vec![b'x'; 129]).into_wire_form(),
            Parameter::literal(vec![b'x'; 129])
        );
        assert_eq!(Parameter::Nil.into_wire_form(), Parameter::Nil);
    }

    #[test]
    fn test_is_partial() {
        let mut chunk = LiteralChunk::complete(&b"abc"[..], false);
        assert!(!Parameter::Chunk(chunk.clone()).is_partial());
        chunk.partial = true;
        assert!(Parameter::Chunk(chunk).is_partial());
        assert!(!Parameter::Nil.is_partial());
    }
}
