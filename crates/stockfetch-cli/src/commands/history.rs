use log::debug;

use stockfetch_core::{HistoryBar, HistoryRequest, MarketData, Symbol};

use crate::cli::HistoryArgs;
use crate::error::CliError;

pub async fn run(
    args: &HistoryArgs,
    provider: &dyn MarketData,
) -> Result<Vec<HistoryBar>, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let request = HistoryRequest::new(symbol, args.period.as_str(), args.interval.as_str())?;
    debug!(
        "history | source: {} | symbol: {} | period: {} | interval: {}",
        provider.name(),
        request.symbol,
        request.period,
        request.interval
    );

    Ok(provider.history(&request).await?)
}
