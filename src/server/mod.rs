//! Streaming transport: JSON-line TCP server and wire protocol.

pub mod protocol;
pub mod server;

pub use protocol::{Request, Response};
pub use server::{TranscribeServer, bind_listener};
