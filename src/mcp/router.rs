//! Method routing for decoded requests
//!
//! `params` stays an open JSON value only until the method is known; each method
//! then decodes the exact shape it accepts.

use chrono::{SecondsFormat, Utc};
use rust_mcp_sdk::schema::{ListToolsResult, ProtocolVersion};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::tools::ToolRegistry;
use crate::errors::RpcError;

#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    Initialize,
    Ping,
    ListTools,
    CallTool(CallToolParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<Map<String, Value>>,
}

impl Method {
    pub fn parse(method: &str, params: Option<Value>) -> Result<Self, RpcError> {
        match method {
            "initialize" => Ok(Self::Initialize),
            "ping" => Ok(Self::Ping),
            "tools/list" => Ok(Self::ListTools),
            "tools/call" => parse_call_params(params).map(Self::CallTool),
            other => Err(RpcError::method_not_found(other)),
        }
    }
}

fn parse_call_params(params: Option<Value>) -> Result<CallToolParams, RpcError> {
    let Some(Value::Object(mut object)) = params else {
        return Err(RpcError::invalid_params("params must be an object"));
    };

    let name = match object.remove("name") {
        Some(Value::String(name)) => name,
        _ => {
            return Err(RpcError::invalid_params(
                "params.name is required and must be a string",
            ))
        }
    };

    let arguments = match object.remove("arguments") {
        None | Some(Value::Null) => None,
        Some(Value::Object(arguments)) => Some(arguments),
        Some(_) => {
            return Err(RpcError::invalid_params(
                "params.arguments must be an object",
            ))
        }
    };

    Ok(CallToolParams { name, arguments })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
    pub capabilities: Capabilities,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub tools: ToolCapabilities,
}

#[derive(Debug, Serialize)]
pub struct ToolCapabilities {
    pub call: Toggle,
    pub list: ListCapability,
}

#[derive(Debug, Serialize)]
pub struct Toggle {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCapability {
    pub enabled: bool,
    pub list_changed: bool,
}

pub fn initialize_result() -> InitializeResult {
    InitializeResult {
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        server_info: ServerInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
        capabilities: Capabilities {
            tools: ToolCapabilities {
                call: Toggle { enabled: true },
                list: ListCapability {
                    enabled: true,
                    list_changed: false,
                },
            },
        },
    }
}

/// Resolves one request against the registry. Never panics; every failure
/// comes back as an `RpcError` for the caller to wrap.
pub fn route(
    method: &str,
    params: Option<Value>,
    registry: &ToolRegistry,
) -> Result<Value, RpcError> {
    match Method::parse(method, params)? {
        Method::Initialize => to_result(initialize_result()),
        Method::Ping => Ok(serde_json::json!({
            "pong": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })),
        Method::ListTools => to_result(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: registry.list(),
        }),
        Method::CallTool(call) => registry.call(&call.name, call.arguments),
    }
}

fn to_result(value: impl Serialize) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|err| RpcError::internal(err.to_string()))
}
