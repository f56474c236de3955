use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use stockfetch_core::{MarketData, DEFAULT_INTERVAL, DEFAULT_PERIOD};

use crate::cli::{HistoryArgs, Query, QuoteArgs};
use crate::commands;

pub const QUOTE_TOOL: &str = "getStockQuote";
pub const HISTORY_TOOL: &str = "getHistoricalData";

const SYMBOL_HINT: &str = "The stock symbol (e.g., RELIANCE.NS for Reliance Industries)";
const PERIOD_HINT: &str = "Time period (e.g., 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)";
const INTERVAL_HINT: &str =
    "Data interval (e.g., 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo)";

/// `tools/list` payload.
pub fn definitions() -> Value {
    json!([
        {
            "name": QUOTE_TOOL,
            "description": "Get the current price of a stock",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "symbol": { "type": "string", "description": SYMBOL_HINT }
                },
                "required": ["symbol"]
            },
            "outputSchema": {
                "type": "object",
                "properties": {
                    "symbol": { "type": "string" },
                    "price": { "type": "number" },
                    "name": { "type": ["string", "null"] }
                },
                "required": ["symbol", "price", "name"]
            }
        },
        {
            "name": HISTORY_TOOL,
            "description": "Fetch historical stock prices",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "symbol": { "type": "string", "description": SYMBOL_HINT },
                    "period": {
                        "type": "string",
                        "description": PERIOD_HINT,
                        "default": DEFAULT_PERIOD
                    },
                    "interval": {
                        "type": "string",
                        "description": INTERVAL_HINT,
                        "default": DEFAULT_INTERVAL
                    }
                },
                "required": ["symbol"]
            },
            "outputSchema": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string" },
                        "open": { "type": "number" },
                        "high": { "type": "number" },
                        "low": { "type": "number" },
                        "close": { "type": "number" },
                        "volume": { "type": "integer" }
                    },
                    "required": ["date", "open", "high", "low", "close", "volume"]
                }
            }
        }
    ])
}

/// `tools/call` result: one text block, flagged when the call failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl ToolResult {
    fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text",
                text: text.into(),
            }],
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    pub fn first_text(&self) -> &str {
        self.content.first().map_or("", |block| block.text.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct QuoteInput {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct HistoryInput {
    symbol: String,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    interval: Option<String>,
}

/// Run one tool against the provider. Failures come back as `isError`
/// results, never as protocol errors.
pub async fn call(name: &str, arguments: Value, provider: &dyn MarketData) -> ToolResult {
    let query = match query_for(name, arguments) {
        Ok(Some(query)) => query,
        Ok(None) => return ToolResult::error("Unknown tool"),
        Err(error) => return ToolResult::error(format!("Error: invalid arguments: {error}")),
    };
    debug!("mcp | tools/call | tool: {name} | source: {}", provider.name());

    match commands::run(&query, provider).await {
        Ok(document) => match serde_json::to_string(&document) {
            Ok(text) => ToolResult::text(text),
            Err(error) => ToolResult::error(format!("Error: {error}")),
        },
        Err(error) => ToolResult::error(format!("Error: {error}")),
    }
}

fn query_for(name: &str, arguments: Value) -> Result<Option<Query>, serde_json::Error> {
    let query = match name {
        QUOTE_TOOL => {
            let input: QuoteInput = serde_json::from_value(arguments)?;
            Query::Quote(QuoteArgs {
                symbol: input.symbol,
            })
        }
        HISTORY_TOOL => {
            let input: HistoryInput = serde_json::from_value(arguments)?;
            Query::History(HistoryArgs {
                symbol: input.symbol,
                period: or_default(input.period, DEFAULT_PERIOD),
                interval: or_default(input.interval, DEFAULT_INTERVAL),
            })
        }
        _ => return Ok(None),
    };
    Ok(Some(query))
}

// Empty strings count as absent.
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
