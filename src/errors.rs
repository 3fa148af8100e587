use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const TOOL_NOT_FOUND: i32 = -32004;
pub const INTERNAL_ERROR: i32 = -32603;

/// Wire form of a failed request, `{code, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

/// Recoverable protocol failures. Each one becomes an error response on the
/// originating session; none of them ends the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("Parse error: {detail}")]
    Parse { detail: String },
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },
    #[error("Invalid params: {detail}")]
    InvalidParams { detail: String },
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl RpcError {
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse {
            detail: detail.into(),
        }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::InvalidParams {
            detail: detail.into(),
        }
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Parse { .. } => PARSE_ERROR,
            Self::MethodNotFound { .. } => METHOD_NOT_FOUND,
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::ToolNotFound { .. } => TOOL_NOT_FOUND,
            Self::Internal { .. } => INTERNAL_ERROR,
        }
    }
}

impl From<RpcError> for ErrorObject {
    fn from(err: RpcError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
