use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use stockfetch_core::{
    HistoryBar, HistoryRequest, MarketData, MarketTimestamp, QuoteInfo, SourceError, Symbol,
};

/// In-memory provider that records every history request it receives.
#[derive(Default)]
pub struct StubProvider {
    pub info: QuoteInfo,
    pub bars: Vec<HistoryBar>,
    pub failure: Option<SourceError>,
    pub history_requests: Mutex<Vec<HistoryRequest>>,
}

impl StubProvider {
    pub fn with_info(info: QuoteInfo) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    pub fn with_bars(bars: Vec<HistoryBar>) -> Self {
        Self {
            bars,
            ..Self::default()
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn recorded_history(&self) -> Vec<HistoryRequest> {
        self.history_requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    fn outcome<T>(&self, value: T) -> Result<T, SourceError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(value),
        }
    }
}

impl MarketData for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn quote_info<'a>(
        &'a self,
        _symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, SourceError>> + Send + 'a>> {
        let result = self.outcome(self.info.clone());
        Box::pin(async move { result })
    }

    fn history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<HistoryBar>, SourceError>> + Send + 'a>> {
        self.history_requests
            .lock()
            .expect("request store should not be poisoned")
            .push(req.clone());
        let result = self.outcome(self.bars.clone());
        Box::pin(async move { result })
    }
}

pub fn bar(date: &str, open: f64, high: f64, low: f64, close: f64, volume: i64) -> HistoryBar {
    let date = MarketTimestamp::parse(date).expect("valid timestamp");
    HistoryBar::new(date, open, high, low, close, volume)
}
