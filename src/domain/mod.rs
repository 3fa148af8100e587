//! Ticket data and the tools that expose it

pub mod tickets;
pub mod tools;
