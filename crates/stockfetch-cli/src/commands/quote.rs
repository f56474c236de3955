use log::debug;

use stockfetch_core::{MarketData, QuoteRecord, Symbol};

use crate::cli::QuoteArgs;
use crate::error::CliError;

pub async fn run(args: &QuoteArgs, provider: &dyn MarketData) -> Result<QuoteRecord, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    debug!("quote | source: {} | symbol: {symbol}", provider.name());

    let info = provider.quote_info(&symbol).await?;
    Ok(QuoteRecord::resolve(&symbol, info)?)
}
