//! JSON-RPC 2.0 message types, one message per line

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use unitlens_core::{codes, UnitLensError};

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<JsonValue>, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Server-initiated message; never answered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: JsonValue,
}

impl Notification {
    pub fn new(method: &'static str, params: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl RpcError {
    pub fn parse_error(details: impl Into<String>) -> Self {
        UnitLensError::parse_error(details).into()
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        UnitLensError::invalid_request(details).into()
    }

    pub fn method_not_found(method: &str) -> Self {
        UnitLensError::method_not_found(method).into()
    }
}

impl From<UnitLensError> for RpcError {
    fn from(err: UnitLensError) -> Self {
        let code = match err.code.as_str() {
            codes::PARSE_ERROR => PARSE_ERROR,
            codes::INVALID_REQUEST => INVALID_REQUEST,
            codes::METHOD_NOT_FOUND => METHOD_NOT_FOUND,
            codes::INVALID_PARAMS | codes::UNKNOWN_CONVERTER | codes::SETTINGS_ERROR => {
                INVALID_PARAMS
            }
            _ => INTERNAL_ERROR,
        };
        Self {
            code,
            message: err.message.clone(),
            data: Some(json!(err)),
        }
    }
}
