use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::data_source::{HistoryRequest, MarketData, SourceError, SourceErrorKind};
use crate::http_client::{HttpAuth, HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::{volume_to_integer, ExchangeZone, HistoryBar, QuoteInfo, Symbol, ValidationError};

const SESSION_URL: &str = "https://fc.yahoo.com";
const CRUMB_URLS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const REFERER: &str = "https://finance.yahoo.com/";
const MAX_CRUMB_LEN: usize = 100;

// ============================================================================
// Session - cookie/crumb handshake
// ============================================================================

/// Cached Yahoo crumb for the lifetime of the adapter.
///
/// The quoteSummary endpoint requires:
/// 1. A session cookie from fc.yahoo.com (kept by the transport's cookie jar)
/// 2. A crumb from /v1/test/getcrumb bound to that cookie
#[derive(Debug, Default)]
struct YahooSession {
    crumb: Mutex<Option<String>>,
}

impl YahooSession {
    fn cached(&self) -> Option<String> {
        self.crumb
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, crumb: String) {
        *self.crumb.lock().unwrap_or_else(PoisonError::into_inner) = Some(crumb);
    }
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance market-data provider.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    timeout_ms: u64,
    session: Arc<YahooSession>,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &ProviderConfig) -> Self {
        let auth = match &config.cookie {
            Some(cookie) => HttpAuth::Cookie(cookie.clone()),
            None => HttpAuth::None,
        };

        Self {
            http_client,
            auth,
            timeout_ms: config.timeout_ms,
            session: Arc::new(YahooSession::default()),
        }
    }

    /// Adapter backed by a real reqwest transport.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, HttpError> {
        let client = ReqwestHttpClient::new(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    fn request(&self, url: &str) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms)
    }

    /// GET a URL and return the body of a 2xx response.
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .http_client
            .execute(self.request(url))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            })?;

        if response.is_success() {
            Ok(response.body)
        } else {
            Err(status_error(response.status, &response.body))
        }
    }

    async fn crumb(&self) -> Result<String, SourceError> {
        if let Some(crumb) = self.session.cached() {
            return Ok(crumb);
        }

        debug!("yahoo | session | url: {SESSION_URL}");
        // fc.yahoo.com answers 404 while still setting the cookie, so only
        // transport failures matter here.
        self.http_client
            .execute(self.request(SESSION_URL))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message()))
            })?;

        for endpoint in CRUMB_URLS {
            debug!("yahoo | crumb | url: {endpoint}");
            let response = match self.http_client.execute(self.request(endpoint)).await {
                Ok(response) if response.is_success() => response,
                Ok(response) if response.status == 429 => {
                    return Err(SourceError::rate_limited(
                        "yahoo rate limited while fetching crumb",
                    ));
                }
                _ => continue,
            };

            match validate_crumb(&response.body) {
                Ok(crumb) => {
                    self.session.store(crumb.clone());
                    return Ok(crumb);
                }
                Err(error) if error.kind() == SourceErrorKind::RateLimited => {
                    return Err(error);
                }
                Err(_) => continue,
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch Yahoo crumb from all endpoints",
        ))
    }

    async fn fetch_quote_info(&self, symbol: &Symbol) -> Result<QuoteInfo, SourceError> {
        let crumb = self.crumb().await?;
        let endpoint = format!(
            "{QUOTE_SUMMARY_URL}/{}?modules=financialData,price",
            urlencoding::encode(symbol.as_str())
        );
        debug!("yahoo | quote | url: {endpoint}");

        let body = self
            .fetch(&format!("{endpoint}&crumb={}", urlencoding::encode(&crumb)))
            .await?;
        parse_quote_summary(&body)
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<Vec<HistoryBar>, SourceError> {
        let endpoint = format!(
            "{CHART_URL}/{}?range={}&interval={}&includePrePost=false&events=div%2Csplits",
            urlencoding::encode(req.symbol.as_str()),
            urlencoding::encode(&req.period),
            urlencoding::encode(&req.interval),
        );
        debug!("yahoo | history | url: {endpoint}");

        let body = self.fetch(&endpoint).await?;
        let bars = parse_chart(&body, req.is_daily_or_coarser())?;
        debug!("yahoo | history | {} bars for {}", bars.len(), req.symbol);
        Ok(bars)
    }
}

impl MarketData for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn quote_info<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_quote_info(symbol))
    }

    fn history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryBar>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_history(req))
    }
}

// ============================================================================
// Response decoding
// ============================================================================

fn validate_crumb(body: &str) -> Result<String, SourceError> {
    let body = body.trim();

    if body.to_ascii_lowercase().contains("too many requests") {
        return Err(SourceError::rate_limited(
            "yahoo rate limited while fetching crumb",
        ));
    }
    if body.contains("<html") || body.contains("<!DOCTYPE") {
        return Err(SourceError::unavailable("yahoo returned an HTML crumb page"));
    }
    if body.is_empty() || body.len() >= MAX_CRUMB_LEN || body.contains(char::is_whitespace) {
        return Err(SourceError::unavailable("yahoo returned a malformed crumb"));
    }

    Ok(body.to_owned())
}

/// Map a non-2xx response, preferring Yahoo's own error description.
fn status_error(status: u16, body: &str) -> SourceError {
    let description = embedded_error_description(body)
        .unwrap_or_else(|| format!("yahoo returned status {status}"));

    match status {
        404 => SourceError::not_found(description),
        429 => SourceError::rate_limited(description),
        _ => SourceError::unavailable(description),
    }
}

/// Yahoo wraps errors as `{"<endpoint>": {"result": null, "error": {...}}}`.
fn embedded_error_description(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.as_object()?.values().find_map(|payload| {
        payload
            .get("error")?
            .get("description")?
            .as_str()
            .filter(|description| !description.is_empty())
            .map(str::to_owned)
    })
}

fn parse_quote_summary(body: &str) -> Result<QuoteInfo, SourceError> {
    let response: YahooQuoteSummaryResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo quote summary: {e}")))?;

    if let Some(error) = response.quote_summary.error {
        return Err(error.into_source_error());
    }

    let result = response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::not_found("yahoo returned no quote data"))?;

    let (regular_market_price, short_name) = match result.price {
        Some(price) => (price.regular_market_price.and_then(|v| v.raw), price.short_name),
        None => (None, None),
    };

    Ok(QuoteInfo {
        current_price: result
            .financial_data
            .and_then(|data| data.current_price)
            .and_then(|v| v.raw),
        regular_market_price,
        short_name,
    })
}

/// Zip Yahoo's column arrays into bars.
///
/// Rows with no OHLC values at all are dropped. When an adjusted-close column
/// is present, prices are rescaled by `adjclose / close`. Timestamps are read
/// in `exchangeTimezoneName`, falling back to the fixed `gmtoffset`.
fn parse_chart(body: &str, daily_or_coarser: bool) -> Result<Vec<HistoryBar>, SourceError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = response.chart.error {
        return Err(error.into_source_error());
    }

    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::not_found("yahoo returned no chart data"))?;

    let zone = ExchangeZone::resolve(
        result.meta.exchange_timezone_name.as_deref(),
        result.meta.gmtoffset.unwrap_or(0),
    )?;
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|column| column.adjclose);

    let mut bars = Vec::with_capacity(timestamps.len());
    for (index, &ts) in timestamps.iter().enumerate() {
        let mut date = zone.stamp(ts)?;
        if daily_or_coarser {
            date = zone.midnight(date);
        }

        let open = cell(&quote.open, index);
        let high = cell(&quote.high, index);
        let low = cell(&quote.low, index);
        let close = cell(&quote.close, index);
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        let required = |value: Option<f64>, field: &'static str| {
            value.ok_or_else(|| ValidationError::MissingBarField {
                date: date.to_string(),
                field,
            })
        };
        let mut open = required(open, "open")?;
        let mut high = required(high, "high")?;
        let mut low = required(low, "low")?;
        let mut close = required(close, "close")?;

        if let Some(adjusted) = adjclose.as_deref().and_then(|column| cell(column, index)) {
            if close != 0.0 {
                let ratio = adjusted / close;
                open *= ratio;
                high *= ratio;
                low *= ratio;
                close = adjusted;
            }
        }

        let volume = volume_to_integer(date, cell(&quote.volume, index))?;
        bars.push(HistoryBar::new(date, open, high, low, close, volume));
    }

    Ok(bars)
}

fn cell(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

// Yahoo Finance API response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

impl YahooApiError {
    fn into_source_error(self) -> SourceError {
        let message = if self.description.is_empty() {
            format!("yahoo API error: {}", self.code)
        } else {
            self.description
        };

        if self.code.eq_ignore_ascii_case("not found") {
            SourceError::not_found(message)
        } else {
            SourceError::invalid_request(message)
        }
    }
}

/// Numeric values arrive wrapped as `{"raw": 1.0, "fmt": "1.00"}`, or `{}`.
#[derive(Debug, Clone, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResult {
    #[serde(rename = "financialData", default)]
    financial_data: Option<YahooFinancialData>,
    #[serde(default)]
    price: Option<YahooPriceData>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooFinancialData {
    #[serde(rename = "currentPrice", default)]
    current_price: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooPriceData {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<YahooRawValue>,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
    #[serde(rename = "exchangeTimezoneName", default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooChartAdjClose>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
