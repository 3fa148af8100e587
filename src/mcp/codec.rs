//! Wire envelope for the ticket protocol
//!
//! Inbound frames are `{id, method, params?}`; outbound frames are
//! `{id, result}` or `{id, error}`, never both.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::errors::{ErrorObject, RpcError};

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: String,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

impl Response {
    pub fn result(id: impl Into<String>, result: Value) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: impl Into<String>, error: impl Into<ErrorObject>) -> Self {
        Self {
            id: id.into(),
            outcome: Outcome::Error(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

/// A frame that could not be read as a request. `id` holds whatever could be
/// salvaged before the failure, or an empty string.
#[derive(Debug, Error, PartialEq)]
#[error("{error}")]
pub struct DecodeFailure {
    pub id: String,
    pub error: RpcError,
}

impl DecodeFailure {
    fn new(id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            error: RpcError::parse(detail),
        }
    }

    pub fn into_response(self) -> Response {
        Response::error(self.id, self.error)
    }
}

pub fn decode(frame: &[u8]) -> Result<Request, DecodeFailure> {
    let payload: Value =
        serde_json::from_slice(frame).map_err(|err| DecodeFailure::new("", err.to_string()))?;

    let Value::Object(mut object) = payload else {
        return Err(DecodeFailure::new("", "request must be a JSON object"));
    };

    let id = object.get("id").map(salvage_id).unwrap_or_default();

    let method = match object.remove("method") {
        Some(Value::String(method)) => method,
        Some(_) => return Err(DecodeFailure::new(id, "method must be a string")),
        None => return Err(DecodeFailure::new(id, "method is required")),
    };

    let params = object.remove("params").filter(|value| !value.is_null());

    Ok(Request { id, method, params })
}

fn salvage_id(value: &Value) -> String {
    match value {
        Value::String(id) => id.clone(),
        Value::Number(number) if number.is_i64() || number.is_u64() => number.to_string(),
        _ => String::new(),
    }
}

/// Serializes a response for the wire. Returns `None` when serialization
/// fails so the caller can drop this one message and keep the session alive.
pub fn encode(response: &Response) -> Option<String> {
    match serde_json::to_string(response) {
        Ok(text) => Some(text),
        Err(err) => {
            error!(id = %response.id, error = %err, "failed to encode response");
            None
        }
    }
}
