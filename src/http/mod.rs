//! HTTP transport layer
//!
//! Routes the `/ws` upgrade into a protocol session and serves the metadata endpoints.

pub mod handlers;
