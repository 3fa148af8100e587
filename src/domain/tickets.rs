//! Read-only ticket dataset served by the ticket tools

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Pending,
    Todo,
    Done,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [Self::Pending, Self::Todo, Self::Done];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub status: TicketStatus,
}

impl Ticket {
    fn new(id: &str, title: &str, status: TicketStatus) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            status,
        }
    }
}

pub fn seed_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new("T1", "Fix login bug", TicketStatus::Pending),
        Ticket::new("T2", "Database indexing", TicketStatus::Pending),
        Ticket::new("T10", "Payment integration", TicketStatus::Done),
        Ticket::new("T11", "Email system", TicketStatus::Done),
        Ticket::new("T20", "Create dashboard UI", TicketStatus::Todo),
        Ticket::new("T21", "Add search filter", TicketStatus::Todo),
    ]
}

/// Keeps the input order; no sorting.
pub fn filter_by_status(tickets: &[Ticket], status: TicketStatus) -> Vec<Ticket> {
    tickets
        .iter()
        .filter(|ticket| ticket.status == status)
        .cloned()
        .collect()
}
