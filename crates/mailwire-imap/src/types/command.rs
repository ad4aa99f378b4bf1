//! Client command values.

use std::fmt;

use super::Parameter;
use super::parameter::wire_parameters;

/// A tagged client command: `tag SP verb *(SP parameter) CRLF`.
///
/// The verb is kept as sent on the wire; no command semantics are attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    tag: String,
    verb: String,
    parameters: Vec<Parameter>,
}

impl Command {
    /// Creates a command. Tag and verb are expected to be non-empty atoms.
    ///
    /// `Text` parameters are stored in their wire form.
    #[must_use]
    pub fn new(
        tag: impl Into<String>,
        verb: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            tag: tag.into(),
            verb: verb.into(),
            parameters: wire_parameters(parameters),
        }
    }

    /// Returns the correlation tag, with its original casing.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the command verb.
    #[must_use]
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Returns the parameters in wire order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the last parameter, if any.
    #[must_use]
    pub fn last_parameter(&self) -> Option<&Parameter> {
        self.parameters.last()
    }

    /// Returns true if the last parameter is an unfinished literal.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.last_parameter().is_some_and(Parameter::is_partial)
    }

    /// Consumes the command and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, String, Vec<Parameter>) {
        (self.tag, self.verb, self.parameters)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write(&mut buf);
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}
