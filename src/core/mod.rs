// Process-level setup: tracing and the HTTP server

pub mod logging;
pub mod server;
