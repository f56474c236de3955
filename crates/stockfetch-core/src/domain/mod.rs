//! # Domain Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`QuoteInfo`] | Raw quote fields reported by a provider |
//! | [`QuoteRecord`] | Quote output: symbol, resolved price, short name |
//! | [`HistoryBar`] | One OHLCV bar of history output |
//! | [`Symbol`] | Validated ticker symbol |
//! | [`MarketTimestamp`] | Bar timestamp in the exchange's offset |
//! | [`ExchangeZone`] | Exchange clock: IANA zone or fixed offset |

mod models;
mod symbol;
mod timestamp;

pub use models::{volume_to_integer, HistoryBar, QuoteInfo, QuoteRecord};
pub use symbol::Symbol;
pub use timestamp::{ExchangeZone, MarketTimestamp};
