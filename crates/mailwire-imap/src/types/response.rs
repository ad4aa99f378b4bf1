//! Server response values.

use std::fmt;

use bytes::Bytes;

use super::Parameter;
use super::parameter::wire_parameters;

/// Status keyword of a status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed (operational error).
    No,
    /// Command failed (protocol/syntax error).
    Bad,
    /// Server greeting (pre-authenticated).
    PreAuth,
    /// Server is closing connection.
    Bye,
}

impl Status {
    /// Matches a status keyword, ignoring ASCII case.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [Self::Ok, Self::No, Self::Bad, Self::PreAuth, Self::Bye]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(keyword))
    }

    /// Returns the wire keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::No => "NO",
            Self::Bad => "BAD",
            Self::PreAuth => "PREAUTH",
            Self::Bye => "BYE",
        }
    }

    /// Returns true if a response with this status may carry a tag.
    #[must_use]
    pub const fn accepts_tag(self) -> bool {
        matches!(self, Self::Ok | Self::No | Self::Bad)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bracketed response code: `[NAME params]`.
///
/// The code is kept generic; `parameters` holds the flattened parameters
/// following the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseCode {
    /// Code name, e.g. `ALERT` or `PERMANENTFLAGS`.
    pub name: String,
    /// Parameters after the name.
    pub parameters: Vec<Parameter>,
}

impl ResponseCode {
    /// Creates a response code without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a response code with parameters, storing `Text` in its wire form.
    #[must_use]
    pub fn with_parameters(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters: wire_parameters(parameters),
        }
    }
}

/// A decoded server response line.
///
/// PREAUTH and BYE have no tag field, and server data responses are always
/// untagged. Trailing text is kept as the octets that were sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Response {
    /// OK status response.
    Ok {
        /// Command tag, `None` for `*`.
        tag: Option<String>,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: Bytes,
    },
    /// NO status response.
    No {
        /// Command tag, `None` for `*`.
        tag: Option<String>,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: Bytes,
    },
    /// BAD status response.
    Bad {
        /// Command tag, `None` for `*`.
        tag: Option<String>,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: Bytes,
    },
    /// PREAUTH greeting.
    PreAuth {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: Bytes,
    },
    /// BYE notice.
    Bye {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: Bytes,
    },
    /// Untagged server data, e.g. `* CAPABILITY IMAP4rev1 IDLE`.
    Server {
        /// Response verb.
        verb: String,
        /// Trailing parameters.
        parameters: Vec<Parameter>,
    },
    /// Untagged message data, e.g. `* 5 RECENT` or `* 12 FETCH (...)`.
    MessageStatus {
        /// Message sequence number or count.
        number: u32,
        /// Response verb.
        verb: String,
        /// Trailing parameters.
        parameters: Vec<Parameter>,
    },
    /// Continuation request: `+ text`.
    Continuation {
        /// Human-readable text (may be empty).
        text: Bytes,
    },
}

impl Response {
    /// Creates untagged server data, storing `Text` parameters in their wire form.
    #[must_use]
    pub fn server(verb: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self::Server {
            verb: verb.into(),
            parameters: wire_parameters(parameters),
        }
    }

    /// Creates untagged message data, storing `Text` parameters in their wire form.
    #[must_use]
    pub fn message_status(
        number: u32,
        verb: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self::MessageStatus {
            number,
            verb: verb.into(),
            parameters: wire_parameters(parameters),
        }
    }

    /// Returns the tag, if the response is tagged.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Ok { tag, .. } | Self::No { tag, .. } | Self::Bad { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the response carries a command tag.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        self.tag().is_some()
    }

    /// Returns the status keyword, if this is a status response.
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::Ok { .. } => Some(Status::Ok),
            Self::No { .. } => Some(Status::No),
            Self::Bad { .. } => Some(Status::Bad),
            Self::PreAuth { .. } => Some(Status::PreAuth),
            Self::Bye { .. } => Some(Status::Bye),
            Self::Server { .. } | Self::MessageStatus { .. } | Self::Continuation { .. } => None,
        }
    }

    /// Returns the response code of a status response.
    #[must_use]
    pub const fn code(&self) -> Option<&ResponseCode> {
        match self {
            Self::Ok { code, .. }
            | Self::No { code, .. }
            | Self::Bad { code, .. }
            | Self::PreAuth { code, .. }
            | Self::Bye { code, .. } => code.as_ref(),
            Self::Server { .. } | Self::MessageStatus { .. } | Self::Continuation { .. } => None,
        }
    }

    /// Returns the human-readable text of a status or continuation response.
    #[must_use]
    pub fn text(&self) -> Option<&[u8]> {
        match self {
            Self::Ok { text, .. }
            | Self::No { text, .. }
            | Self::Bad { text, .. }
            | Self::PreAuth { text, .. }
            | Self::Bye { text, .. }
            | Self::Continuation { text } => Some(&text[..]),
            Self::Server { .. } | Self::MessageStatus { .. } => None,
        }
    }

    /// Returns the trailing parameters of a data response.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        match self {
            Self::Server { parameters, .. } | Self::MessageStatus { parameters, .. } => parameters,
            _ => &[],
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write(&mut buf);
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_keyword() {
        assert_eq!(Status::from_keyword("OK"), Some(Status::Ok));
        assert_eq!(Status::from_keyword("ok"), Some(Status::Ok));
        assert_eq!(Status::from_keyword("PreAuth"), Some(Status::PreAuth));
        assert_eq!(Status::from_keyword("BYE"), Some(Status::Bye));
        assert_eq!(Status::from_keyword("CAPABILITY"), None);
        assert_eq!(Status::from_keyword("OKAY"), None);
    }

    #[test]
    fn test_accepts_tag() {
        assert!(Status::Ok.accepts_tag());
        assert!(Status::No.accepts_tag());
        assert!(Status::Bad.accepts_tag());
        assert!(!Status::PreAuth.accepts_tag());
        assert!(!Status::Bye.accepts_tag());
    }

    #[test]
    fn test_response_accessors() {
        let ok = Response::Ok {
            tag: Some("A001".into()),
            code: Some(ResponseCode::new("ALERT")),
            text: "LOGIN Completed".into(),
        };
        assert_eq!(ok.tag(), Some("A001"));
        assert!(ok.is_tagged());
        assert_eq!(ok.status(), Some(Status::Ok));
        assert_eq!(ok.code().map(|c| c.name.as_str()), Some("ALERT"));
        assert_eq!(ok.text(), Some(&b"LOGIN Completed"[..]));
        assert!(ok.parameters().is_empty());

        let recent = Response::MessageStatus {
            number: 5,
            verb: "RECENT".into(),
            parameters: Vec::new(),
        };
        assert!(!recent.is_tagged());
        assert_eq!(recent.status(), None);
        assert_eq!(recent.text(), None);
    }

    #[test]
    fn test_data_constructors() {
        let list = Response::server(
            "LIST",
            vec![
                Parameter::OpenList,
                Parameter::CloseList,
                Parameter::quoted("/"),
                Parameter::text("Sent Items"),
            ],
        );
        assert_eq!(list.parameters()[3], Parameter::quoted("Sent Items"));

        let fetch = Response::message_status(3, "FETCH", vec![Parameter::text("a\r\nb")]);
        assert_eq!(fetch.parameters(), &[Parameter::literal("a\r\nb")]);
    }
}
