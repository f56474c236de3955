//! Market-data provider contract and request/error types.
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | Quote | [`Symbol`] | [`QuoteInfo`] |
//! | History | [`HistoryRequest`] | `Vec<HistoryBar>` |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{HistoryBar, QuoteInfo, Symbol, ValidationError};

pub const DEFAULT_PERIOD: &str = "1mo";
pub const DEFAULT_INTERVAL: &str = "1d";

/// Provider error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    NotFound,
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Request payload for the history endpoint.
///
/// `period` and `interval` are passed through to the provider untouched; only
/// emptiness is rejected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: String,
    pub interval: String,
}

impl HistoryRequest {
    pub fn new(
        symbol: Symbol,
        period: impl Into<String>,
        interval: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let period = period.into().trim().to_owned();
        let interval = interval.into().trim().to_owned();

        if period.is_empty() {
            return Err(ValidationError::EmptyParameter { field: "period" });
        }
        if interval.is_empty() {
            return Err(ValidationError::EmptyParameter { field: "interval" });
        }

        Ok(Self {
            symbol,
            period,
            interval,
        })
    }

    /// Daily, weekly and monthly bars are keyed by date rather than time.
    pub fn is_daily_or_coarser(&self) -> bool {
        let interval = self.interval.as_str();
        interval.ends_with('d') || interval.ends_with("wk") || interval.ends_with("mo")
    }
}

/// Market-data provider contract.
pub trait MarketData: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Fetches the raw quote fields for one symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the symbol is unknown, the provider is
    /// unreachable or rate limited, or the response cannot be decoded.
    fn quote_info<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, SourceError>> + Send + 'a>>;

    /// Fetches bars oldest to newest. An empty range yields an empty vector.
    ///
    /// # Errors
    ///
    /// Same conditions as [`quote_info`](MarketData::quote_info), plus bars
    /// that violate the record invariants.
    fn history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryBar>, SourceError>> + Send + 'a>>;
}
