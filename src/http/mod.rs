//! HTTP server startup and shutdown.
//!
//! The server listens on plain HTTP and shuts down gracefully on
//! SIGTERM/SIGINT, draining in-flight requests first.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
