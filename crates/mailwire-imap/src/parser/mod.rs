//! Streaming IMAP decoders.
//!
//! The decoders drive the lexers through a full command or response line and
//! emit one value per completed line. They never block: when the buffer runs
//! out they return `Ok(None)` and pick up from the same point on the next call.

mod builder;
mod command;
pub mod lexer;
mod response;

pub use builder::{CommandBuilder, ResponseBuilder};
pub use command::CommandDecoder;
pub use response::ResponseDecoder;
