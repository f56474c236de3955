//! Scripted Yahoo transport shared by the integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stockfetch_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ProviderConfig, YahooAdapter,
};

pub const SESSION: &str = "https://fc.yahoo.com";
pub const CRUMB_1: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
pub const CRUMB_2: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
pub const QUOTE_SUMMARY: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
pub const CHART: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

pub const AAPL_SUMMARY: &str = r#"{"quoteSummary":{"result":[{
    "financialData":{"currentPrice":{"raw":150.25,"fmt":"150.25"}},
    "price":{"regularMarketPrice":{"raw":149.9,"fmt":"149.90"},"shortName":"Apple Inc."}
}],"error":null}}"#;

pub const INDEX_SUMMARY: &str = r#"{"quoteSummary":{"result":[{
    "price":{"regularMarketPrice":{"raw":5021.84,"fmt":"5,021.84"},"shortName":"S&P 500"}
}],"error":null}}"#;

/// Three daily NYSE bars; adjusted close equals close.
pub const AAPL_CHART: &str = r#"{"chart":{"result":[{
    "meta":{"currency":"USD","symbol":"AAPL","gmtoffset":-18000,
            "exchangeTimezoneName":"America/New_York"},
    "timestamp":[1704205800,1704292200,1704378600],
    "indicators":{
        "quote":[{
            "open":[187.15,184.22,182.15],
            "high":[188.44,185.88,183.09],
            "low":[183.89,183.43,180.88],
            "close":[185.64,184.25,181.91],
            "volume":[82488700,58414500,71983600]
        }],
        "adjclose":[{"adjclose":[185.64,184.25,181.91]}]
    }
}],"error":null}}"#;

/// One July daily bar in a chart whose `gmtoffset` is New York winter time.
pub const SUMMER_CHART: &str = r#"{"chart":{"result":[{
    "meta":{"currency":"USD","symbol":"AAPL","gmtoffset":-18000,
            "exchangeTimezoneName":"America/New_York"},
    "timestamp":[1719840600],
    "indicators":{
        "quote":[{
            "open":[212.09],"high":[217.51],"low":[211.92],"close":[216.75],
            "volume":[60402900]
        }],
        "adjclose":[{"adjclose":[216.75]}]
    }
}],"error":null}}"#;

pub const EMPTY_CHART: &str = r#"{"chart":{"result":[{
    "meta":{"currency":"USD","symbol":"AAPL","gmtoffset":-18000},
    "indicators":{"quote":[{}],"adjclose":[{}]}
}],"error":null}}"#;

pub const DELISTED_CHART: &str = r#"{"chart":{"result":null,"error":{
    "code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

type Outcome = Result<HttpResponse, HttpError>;

/// Answers each request from the first route whose URL prefix matches.
/// Unscripted URLs get a 404.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: Vec<(String, Outcome)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie and crumb endpoints answering like Yahoo does.
    pub fn with_session(crumb: &str) -> Self {
        Self::new()
            .route(SESSION, HttpResponse::new(404, "<html>Not Found</html>"))
            .route(CRUMB_1, HttpResponse::ok_json(crumb))
    }

    pub fn route(mut self, prefix: &str, response: HttpResponse) -> Self {
        self.routes.push((prefix.to_owned(), Ok(response)));
        self
    }

    pub fn fail(mut self, prefix: &str, error: HttpError) -> Self {
        self.routes.push((prefix.to_owned(), Err(error)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let outcome = self
            .routes
            .iter()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "unscripted")));

        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        Box::pin(async move { outcome })
    }
}

pub fn adapter(client: &Arc<ScriptedHttpClient>) -> YahooAdapter {
    adapter_with_config(client, &ProviderConfig::default())
}

pub fn adapter_with_config(
    client: &Arc<ScriptedHttpClient>,
    config: &ProviderConfig,
) -> YahooAdapter {
    YahooAdapter::new(client.clone(), config)
}
