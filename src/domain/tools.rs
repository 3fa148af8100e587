//! Ticket tools exposed via Model Context Protocol
//!
//! Each tool takes no arguments and returns the tickets with one fixed status.
//! The registry is built once at startup and only read afterwards.

use std::sync::Arc;

use rust_mcp_sdk::{macros, schema::Tool};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::tickets::{filter_by_status, Ticket, TicketStatus};
use crate::errors::RpcError;

#[macros::mcp_tool(
    name = "get_pending_tickets",
    description = "Get tickets that are pending"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetPendingTicketsTool {}

#[macros::mcp_tool(name = "get_done_tickets", description = "Get tickets that are done")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetDoneTicketsTool {}

#[macros::mcp_tool(
    name = "get_todo_tickets",
    description = "Get tickets that are still to do"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetTodoTicketsTool {}

pub type TicketProducer = Box<dyn Fn() -> Vec<Ticket> + Send + Sync>;

struct RegisteredTool {
    descriptor: Tool,
    producer: TicketProducer,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three status tools over `tickets`, in their canonical order.
    pub fn with_ticket_tools(tickets: Vec<Ticket>) -> Self {
        let tickets: Arc<[Ticket]> = Arc::from(tickets);
        let mut registry = Self::new();

        for (descriptor, status) in [
            (GetPendingTicketsTool::tool(), TicketStatus::Pending),
            (GetDoneTicketsTool::tool(), TicketStatus::Done),
            (GetTodoTicketsTool::tool(), TicketStatus::Todo),
        ] {
            let tickets = Arc::clone(&tickets);
            registry.register(
                descriptor,
                Box::new(move || filter_by_status(&tickets, status)),
            );
        }

        registry
    }

    pub fn register(&mut self, descriptor: Tool, producer: TicketProducer) {
        self.tools.push(RegisteredTool {
            descriptor,
            producer,
        });
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool| tool.descriptor.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Runs the named tool. `arguments` is not consulted by any ticket tool but
    /// is echoed back under `meta.arguments` when supplied.
    pub fn call(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<Value, RpcError> {
        let tool = self.lookup(name).ok_or_else(|| RpcError::tool_not_found(name))?;

        let tickets = (tool.producer)();
        let mut meta = Map::from_iter([("count".to_string(), json!(tickets.len()))]);
        if let Some(arguments) = arguments {
            meta.insert("arguments".to_string(), Value::Object(arguments));
        }

        Ok(json!({
            "tickets": tickets,
            "meta": meta,
        }))
    }

    fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|tool| tool.descriptor.name == name)
    }
}
