//! Editor bridge
//!
//! A stdio server that connects an editor to the compile triggers and the
//! keyword hover table.

pub mod document;
pub mod server;
pub mod sink;

pub use document::DocumentManager;
pub use server::{ZServer, COMPILE_COMMAND};
pub use sink::ClientSink;
