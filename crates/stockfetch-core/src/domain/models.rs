use serde::{Deserialize, Serialize};

use crate::{MarketTimestamp, Symbol, ValidationError};

/// Loosely-typed quote fields as the provider reports them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInfo {
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub short_name: Option<String>,
}

/// Quote output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    pub symbol: String,
    pub price: f64,
    pub name: Option<String>,
}

impl QuoteRecord {
    /// Resolve the price as current price first, regular-market price second.
    ///
    /// A zero current price counts as unset.
    pub fn resolve(symbol: &Symbol, info: QuoteInfo) -> Result<Self, ValidationError> {
        let price = info
            .current_price
            .filter(|price| price.is_finite() && *price != 0.0)
            .or_else(|| info.regular_market_price.filter(|price| price.is_finite()))
            .ok_or_else(|| ValidationError::MissingPrice {
                symbol: symbol.to_string(),
            })?;

        Ok(Self {
            symbol: symbol.to_string(),
            price,
            name: info.short_name,
        })
    }
}

/// One OHLCV bar of history output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryBar {
    pub date: MarketTimestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl HistoryBar {
    pub fn new(
        date: MarketTimestamp,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Convert a provider volume to an integer, truncating toward zero.
pub fn volume_to_integer(
    date: MarketTimestamp,
    volume: Option<f64>,
) -> Result<i64, ValidationError> {
    match volume {
        None => Ok(0),
        Some(value) if value.is_finite() && value.abs() < i64::MAX as f64 => {
            Ok(value.trunc() as i64)
        }
        Some(_) => Err(ValidationError::VolumeNotInteger {
            date: date.to_string(),
        }),
    }
}
