//! # MCP stdio server
//!
//! `stockfetch serve` exposes the two lookups as Model Context Protocol tools.
//! Framing is newline-delimited JSON-RPC 2.0: one request per line on stdin,
//! one response per line on stdout, logs on stderr.
//!
//! | Method | Result |
//! |--------|--------|
//! | `initialize` | protocol version, `tools` capability, server info |
//! | `ping` | `{}` |
//! | `tools/list` | `getStockQuote`, `getHistoricalData` |
//! | `tools/call` | one text block; `isError` when the lookup failed |
//!
//! Notifications (requests without an `id`) are never answered.

mod tools;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use stockfetch_core::MarketData;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::CliError;

const JSONRPC_VERSION: &str = "2.0";
const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "stockfetch";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    fn reply(id: Value, outcome: Result<Value, RpcError>) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(error) => (None, Some(error)),
        };
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
            error,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Answers JSON-RPC lines against one provider.
pub struct McpServer<'a> {
    provider: &'a dyn MarketData,
}

impl<'a> McpServer<'a> {
    pub fn new(provider: &'a dyn MarketData) -> Self {
        Self { provider }
    }

    /// Response for one input line, or `None` for blank lines and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(error) => {
                let error = RpcError::new(PARSE_ERROR, format!("parse error: {error}"));
                return Some(RpcResponse::reply(Value::Null, Err(error)));
            }
        };
        let id_hint = value.get("id").cloned().unwrap_or(Value::Null);
        let request: RpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(error) => {
                let error = RpcError::new(INVALID_REQUEST, format!("invalid request: {error}"));
                return Some(RpcResponse::reply(id_hint, Err(error)));
            }
        };

        let Some(id) = request.id else {
            debug!("mcp | notification | {}", request.method);
            return None;
        };
        debug!("mcp | request | {}", request.method);
        let outcome = self.dispatch(&request.method, request.params).await;
        Some(RpcResponse::reply(id, outcome))
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(initialize_result(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::definitions() })),
            "tools/call" => {
                let call: CallParams = serde_json::from_value(params).map_err(|error| {
                    RpcError::new(INVALID_PARAMS, format!("invalid params: {error}"))
                })?;
                let result = tools::call(&call.name, call.arguments, self.provider).await;
                if result.is_error {
                    warn!("mcp | {} failed | {}", call.name, result.first_text());
                }
                serde_json::to_value(result)
                    .map_err(|error| RpcError::new(INTERNAL_ERROR, error.to_string()))
            }
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            )),
        }
    }
}

fn initialize_result(params: &Value) -> Value {
    let version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);
    json!({
        "protocolVersion": version,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
    })
}

/// Serve until the reader reaches end of input. Each response is flushed as
/// soon as it is written.
pub async fn serve<R, W>(
    provider: &dyn MarketData,
    reader: R,
    mut writer: W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let server = McpServer::new(provider);
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if let Some(response) = server.handle_line(&line).await {
            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            writer.write_all(&payload).await?;
            writer.flush().await?;
        }
    }
    Ok(())
}

pub async fn serve_stdio(provider: &dyn MarketData) -> Result<(), CliError> {
    info!("mcp | serving tools on stdio | source: {}", provider.name());
    serve(
        provider,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;
    info!("mcp | stdin closed");
    Ok(())
}
