//! Ticket protocol over a long-lived connection
//!
//! Envelope encoding, method routing and the per-connection session loop.

pub mod codec;
pub mod router;
pub mod session;
