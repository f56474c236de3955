//! # stockfetch core
//!
//! Domain records, provider contract and the Yahoo Finance adapter behind the
//! `stockfetch` command-line tool.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo Finance) |
//! | [`config`] | Provider configuration from environment variables |
//! | [`data_source`] | [`MarketData`] trait, history request, provider errors |
//! | [`domain`] | Quote and history records, symbol, timestamp |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport abstraction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockfetch_core::{MarketData, ProviderConfig, QuoteRecord, Symbol, YahooAdapter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = YahooAdapter::from_config(&ProviderConfig::from_env()?)?;
//!     let symbol = Symbol::parse("AAPL")?;
//!
//!     let info = adapter.quote_info(&symbol).await?;
//!     let record = QuoteRecord::resolve(&symbol, info)?;
//!     println!("{}: {}", record.symbol, record.price);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI            │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │────▶│ HTTP Client      │
//! │ (YahooAdapter)  │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Domain Records  │
//! │ (Quote, Bar)    │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Provider failures surface as [`SourceError`] with a [`SourceErrorKind`];
//! record invariants surface as [`ValidationError`]. Nothing is retried.

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;

pub use adapters::YahooAdapter;

pub use config::ProviderConfig;

pub use data_source::{
    HistoryRequest, MarketData, SourceError, SourceErrorKind, DEFAULT_INTERVAL, DEFAULT_PERIOD,
};

pub use domain::{
    volume_to_integer, ExchangeZone, HistoryBar, MarketTimestamp, QuoteInfo, QuoteRecord, Symbol,
};

pub use error::ValidationError;

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
