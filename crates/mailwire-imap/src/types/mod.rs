//! Command, response and parameter values.
//!
//! Values are produced whole by the decoders and are not modified afterwards.
//! Each type has a `write` method producing its wire form without the line
//! terminator, and an `encode` method that appends CRLF.

mod command;
mod parameter;
mod response;
mod serialize;

pub use command::Command;
pub use parameter::{LiteralChunk, Parameter};
pub use response::{Response, ResponseCode, Status};
pub use serialize::write_parameters;
