use thiserror::Error;

/// Validation and contract errors exposed by `stockfetch-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("{field} cannot be empty")]
    EmptyParameter { field: &'static str },

    #[error("no usable price for '{symbol}': neither currentPrice nor regularMarketPrice is set")]
    MissingPrice { symbol: String },

    #[error("bar at {date} is missing '{field}'")]
    MissingBarField { date: String, field: &'static str },
    #[error("bar at {date} has a volume that is not representable as an integer")]
    VolumeNotInteger { date: String },

    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },
    #[error("invalid UTC offset of {seconds} seconds")]
    InvalidOffset { seconds: i64 },

    #[error("invalid value for {key}: '{value}'")]
    InvalidConfig { key: &'static str, value: String },
}

