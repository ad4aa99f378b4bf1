//! Builders that accumulate decoded pieces into one immutable value.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::types::{Command, LiteralChunk, Parameter, Response, ResponseCode, Status};
use crate::{Error, Result};

/// Parameter sequence that merges the chunks of one literal.
///
/// Partial chunks are buffered until the final chunk of the literal arrives,
/// so every finished sequence holds each literal as a single non-partial
/// chunk. A literal that arrived whole is kept without copying.
#[derive(Debug, Default)]
struct ParameterList {
    items: Vec<Parameter>,
    pending: Option<BytesMut>,
}

impl ParameterList {
    fn push(&mut self, param: Parameter) {
        let Parameter::Chunk(chunk) = param else {
            self.items.push(param);
            return;
        };

        if chunk.partial {
            self.pending
                .get_or_insert_with(BytesMut::new)
                .extend_from_slice(&chunk.data);
            return;
        }

        let data = match self.pending.take() {
            Some(mut pending) => {
                pending.extend_from_slice(&chunk.data);
                pending.freeze()
            }
            None => chunk.data,
        };
        self.items.push(Parameter::Chunk(LiteralChunk {
            data,
            partial: false,
            non_synchronizing: chunk.non_synchronizing,
        }));
    }

    fn take(&mut self) -> Vec<Parameter> {
        self.pending = None;
        std::mem::take(&mut self.items)
    }

    fn clear(&mut self) {
        self.items.clear();
        self.pending = None;
    }
}

/// Accumulates the tag, verb and parameters of a command.
#[derive(Debug, Default)]
pub struct CommandBuilder {
    tag: Option<String>,
    verb: Option<String>,
    parameters: ParameterList,
}

impl CommandBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the command tag.
    pub fn tag(&mut self, tag: String) {
        self.tag = Some(tag);
    }

    /// Sets the command verb.
    pub fn verb(&mut self, verb: String) {
        self.verb = Some(verb);
    }

    /// Appends a parameter, merging literal chunks.
    pub fn push(&mut self, param: Parameter) {
        self.parameters.push(param);
    }

    /// Produces the command and clears the builder.
    pub fn build(&mut self) -> Result<Command> {
        let tag = self
            .tag
            .take()
            .ok_or_else(|| Error::corrupted("command without tag"))?;
        let verb = self
            .verb
            .take()
            .ok_or_else(|| Error::corrupted("command without verb"))?;
        Ok(Command::new(tag, verb, self.parameters.take()))
    }

    /// Discards everything accumulated so far.
    pub fn reset(&mut self) {
        self.tag = None;
        self.verb = None;
        self.parameters.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Status(Status),
    Server(String),
    MessageStatus(u32, String),
    Continuation,
}

/// Accumulates the pieces of one response line.
///
/// The response kind decides which pieces are used. A tag on a kind that
/// cannot carry one (PREAUTH, BYE, server data, message data) is dropped.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    tag: Option<String>,
    kind: Option<Kind>,
    code_name: Option<String>,
    code_parameters: ParameterList,
    text: Bytes,
    parameters: ParameterList,
}

impl ResponseBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tag; `None` for an untagged (`*`) response.
    pub fn tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    /// Marks the response as a status response.
    pub fn status(&mut self, status: Status) {
        self.kind = Some(Kind::Status(status));
    }

    /// Marks the response as untagged server data.
    pub fn server(&mut self, verb: String) {
        self.kind = Some(Kind::Server(verb));
    }

    /// Marks the response as untagged message data.
    pub fn message_status(&mut self, number: u32, verb: String) {
        self.kind = Some(Kind::MessageStatus(number, verb));
    }

    /// Marks the response as a continuation request.
    pub fn continuation(&mut self) {
        self.kind = Some(Kind::Continuation);
    }

    /// Sets the response code name.
    pub fn code_name(&mut self, name: String) {
        self.code_name = Some(name);
    }

    /// Appends a response-code parameter.
    pub fn push_code_parameter(&mut self, param: Parameter) {
        self.code_parameters.push(param);
    }

    /// Sets the trailing human-readable text.
    pub fn text(&mut self, text: Bytes) {
        self.text = text;
    }

    /// Appends a data parameter.
    pub fn push(&mut self, param: Parameter) {
        self.parameters.push(param);
    }

    /// Produces the response and clears the builder.
    pub fn build(&mut self) -> Result<Response> {
        let kind = self
            .kind
            .take()
            .ok_or_else(|| Error::corrupted("response without status or verb"))?;
        let tag = self.tag.take();
        let code = self
            .code_name
            .take()
            .map(|name| ResponseCode::with_parameters(name, self.code_parameters.take()));
        let text = std::mem::take(&mut self.text);
        let parameters = self.parameters.take();

        let accepts_tag = matches!(kind, Kind::Status(status) if status.accepts_tag());
        if let Some(tag) = tag.as_deref().filter(|_| !accepts_tag) {
            debug!(tag, kind = ?kind, "dropping tag from response that cannot carry one");
        }

        let response = match kind {
            Kind::Status(Status::Ok) => Response::Ok { tag, code, text },
            Kind::Status(Status::No) => Response::No { tag, code, text },
            Kind::Status(Status::Bad) => Response::Bad { tag, code, text },
            Kind::Status(Status::PreAuth) => Response::PreAuth { code, text },
            Kind::Status(Status::Bye) => Response::Bye { code, text },
            Kind::Server(verb) => Response::Server { verb, parameters },
            Kind::MessageStatus(number, verb) => Response::MessageStatus {
                number,
                verb,
                parameters,
            },
            Kind::Continuation => Response::Continuation { text },
        };
        Ok(response)
    }

    /// Discards everything accumulated so far.
    pub fn reset(&mut self) {
        self.tag = None;
        self.kind = None;
        self.code_name = None;
        self.code_parameters.clear();
        self.text.clear();
        self.parameters.clear();
    }
}
