mod history;
mod quote;

use serde::Serialize;
use stockfetch_core::{HistoryBar, MarketData, QuoteRecord};

use crate::cli::Query;
use crate::error::CliError;

/// Document printed for a command: one object for `quote`, an array for `history`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Quote(QuoteRecord),
    History(Vec<HistoryBar>),
}

pub async fn run(query: &Query, provider: &dyn MarketData) -> Result<CommandOutput, CliError> {
    match query {
        Query::Quote(args) => quote::run(args, provider).await.map(CommandOutput::Quote),
        Query::History(args) => history::run(args, provider)
            .await
            .map(CommandOutput::History),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use stockfetch_core::{QuoteInfo, SourceError};

    use super::*;
    use crate::cli::{HistoryArgs, QuoteArgs};
    use crate::output;
    use crate::test_support::{bar, StubProvider};

    fn quote(symbol: &str) -> Query {
        Query::Quote(QuoteArgs {
            symbol: symbol.to_owned(),
        })
    }

    fn history(symbol: &str, period: &str, interval: &str) -> Query {
        Query::History(HistoryArgs {
            symbol: symbol.to_owned(),
            period: period.to_owned(),
            interval: interval.to_owned(),
        })
    }

    async fn printed(query: &Query, provider: &StubProvider) -> String {
        let document = run(query, provider).await.expect("command should succeed");
        String::from_utf8(output::render(&document).expect("must render")).expect("utf-8")
    }

    #[tokio::test]
    async fn quote_prints_exact_document() {
        let provider = StubProvider::with_info(QuoteInfo {
            current_price: Some(150.25),
            regular_market_price: None,
            short_name: Some(String::from("Apple Inc.")),
        });

        assert_eq!(
            printed(&quote("AAPL"), &provider).await,
            "{\"symbol\": \"AAPL\", \"price\": 150.25, \"name\": \"Apple Inc.\"}\n"
        );
    }

    #[tokio::test]
    async fn quote_falls_back_to_regular_market_price() {
        let provider = StubProvider::with_info(QuoteInfo {
            current_price: None,
            regular_market_price: Some(2841.5),
            short_name: None,
        });

        assert_eq!(
            printed(&quote("RELIANCE.NS"), &provider).await,
            "{\"symbol\": \"RELIANCE.NS\", \"price\": 2841.5, \"name\": null}\n"
        );
    }

    #[tokio::test]
    async fn quote_current_price_wins_over_regular_market_price() {
        let provider = StubProvider::with_info(QuoteInfo {
            current_price: Some(10.0),
            regular_market_price: Some(99.0),
            short_name: None,
        });

        let CommandOutput::Quote(record) =
            run(&quote("X"), &provider).await.expect("should succeed")
        else {
            panic!("expected quote output");
        };
        assert_eq!(record.price, 10.0);
    }

    #[tokio::test]
    async fn quote_without_any_price_is_a_validation_failure() {
        let provider = StubProvider::with_info(QuoteInfo::default());

        let error = run(&quote("AAPL"), &provider).await.expect_err("must fail");
        assert!(matches!(error, CliError::Validation(_)));
        assert_eq!(error.exit_code(), 2);
    }

    #[tokio::test]
    async fn history_with_no_bars_prints_empty_array() {
        let provider = StubProvider::with_bars(Vec::new());

        assert_eq!(printed(&history("AAPL", "1mo", "1d"), &provider).await, "[]\n");
    }

    #[tokio::test]
    async fn history_prints_every_bar_in_provider_order() {
        let provider = StubProvider::with_bars(vec![
            bar("2024-01-02T00:00:00-05:00", 187.15, 188.44, 183.89, 185.64, 82_488_700),
            bar("2024-01-03T00:00:00-05:00", 184.22, 185.88, 183.43, 184.25, 58_414_500),
            bar("2024-01-04T00:00:00-05:00", 182.15, 183.09, 180.88, 181.91, 71_983_600),
        ]);

        let text = printed(&history("AAPL", "5d", "1d"), &provider).await;
        let rows: Vec<Value> = serde_json::from_str(&text).expect("valid json");

        assert_eq!(rows.len(), 3);
        let dates: Vec<&str> = rows.iter().map(|row| row["date"].as_str().expect("date")).collect();
        assert_eq!(
            dates,
            [
                "2024-01-02T00:00:00-05:00",
                "2024-01-03T00:00:00-05:00",
                "2024-01-04T00:00:00-05:00"
            ]
        );
        for row in &rows {
            let object = row.as_object().expect("object");
            assert_eq!(object.len(), 6);
            for field in ["open", "high", "low", "close"] {
                assert!(object[field].is_f64(), "{field} should be a number");
            }
            assert!(object["volume"].is_i64(), "volume should be an integer");
        }
        assert!(text.starts_with(
            "[{\"date\": \"2024-01-02T00:00:00-05:00\", \"open\": 187.15, \"high\": 188.44, \
             \"low\": 183.89, \"close\": 185.64, \"volume\": 82488700}, {"
        ));
    }

    #[tokio::test]
    async fn history_forwards_period_and_interval_untouched() {
        let provider = StubProvider::with_bars(Vec::new());

        run(&history("^GSPC", "ytd", "1wk"), &provider)
            .await
            .expect("should succeed");

        let requests = provider.recorded_history();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].symbol.as_str(), "^GSPC");
        assert_eq!(requests[0].period, "ytd");
        assert_eq!(requests[0].interval, "1wk");
    }

    #[tokio::test]
    async fn invalid_symbol_never_reaches_the_provider() {
        let provider = StubProvider::with_bars(Vec::new());

        let error = run(&history("AA PL", "1mo", "1d"), &provider)
            .await
            .expect_err("must fail");
        assert_eq!(error.exit_code(), 2);
        assert!(provider.recorded_history().is_empty());
    }

    #[tokio::test]
    async fn provider_failures_propagate() {
        let provider = StubProvider::failing(SourceError::not_found(
            "Quote not found for symbol: NOPE",
        ));

        let error = run(&quote("NOPE"), &provider).await.expect_err("must fail");
        assert!(matches!(error, CliError::Source(_)));
        assert_eq!(error.exit_code(), 3);
        assert!(error.to_string().contains("source.not_found"));
    }
}
