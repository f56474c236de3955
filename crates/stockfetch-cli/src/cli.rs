//! CLI argument definitions for stockfetch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote <symbol>` | Current price and short name |
//! | `history <symbol> [period] [interval]` | Historical OHLCV bars |
//! | `serve` | Both lookups as MCP tools over stdio |
//!
//! # Examples
//!
//! ```bash
//! stockfetch quote AAPL
//! stockfetch history RELIANCE.NS 6mo 1wk
//! stockfetch serve
//! ```
//!
//! Runtime settings come from the environment (see `stockfetch_core::config`),
//! not from flags.

use clap::{Args, Parser, Subcommand};
use stockfetch_core::{DEFAULT_INTERVAL, DEFAULT_PERIOD};

/// Fetch stock quotes and price history from Yahoo Finance as JSON.
#[derive(Debug, Parser)]
#[command(name = "stockfetch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Fetch(Query),
    /// Serve getStockQuote and getHistoricalData as MCP tools on stdin/stdout.
    Serve,
}

/// One lookup that produces one JSON document.
#[derive(Debug, Clone, Subcommand)]
pub enum Query {
    /// Print {"symbol", "price", "name"} for one symbol.
    Quote(QuoteArgs),
    /// Print an array of {"date", "open", "high", "low", "close", "volume"} bars.
    History(HistoryArgs),
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Ticker symbol, e.g. AAPL or RELIANCE.NS.
    pub symbol: String,
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    /// Ticker symbol, e.g. AAPL or RELIANCE.NS.
    pub symbol: String,

    /// Time span understood by the provider (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max).
    #[arg(default_value = DEFAULT_PERIOD)]
    pub period: String,

    /// Bar size understood by the provider (1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo).
    #[arg(default_value = DEFAULT_INTERVAL)]
    pub interval: String,
}
