use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 32;

/// Ticker symbol exactly as typed by the user.
///
/// The text is opaque: it is echoed back verbatim in quote output and
/// percent-encoded on the way to the provider, so Yahoo punctuation such as
/// `RELIANCE.NS`, `BRK-B`, `^GSPC`, `EURUSD=X` and `M&M.NS` passes through.
/// Whitespace and control characters never occur in a ticker and are rejected
/// rather than stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let len = input.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some((index, ch)) = input
            .chars()
            .enumerate()
            .find(|(_, ch)| ch.is_whitespace() || ch.is_control())
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_input_verbatim() {
        let parsed = Symbol::parse("aapl").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "aapl");
    }

    #[test]
    fn accepts_yahoo_punctuation() {
        for raw in ["RELIANCE.NS", "BRK-B", "^GSPC", "EURUSD=X", "AAPL240119C00150000"] {
            assert!(Symbol::parse(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn accepts_nse_tickers_with_ampersand() {
        for raw in ["M&M.NS", "M&MFIN.NS", "J&KBANK.NS"] {
            let parsed = Symbol::parse(raw).expect("NSE ticker should parse");
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[test]
    fn rejects_surrounding_or_inner_whitespace() {
        assert_eq!(
            Symbol::parse(" AAPL"),
            Err(ValidationError::SymbolInvalidChar { ch: ' ', index: 0 })
        );
        assert_eq!(
            Symbol::parse("AA PL"),
            Err(ValidationError::SymbolInvalidChar { ch: ' ', index: 2 })
        );
        assert!(matches!(
            Symbol::parse("AAPL\n"),
            Err(ValidationError::SymbolInvalidChar { ch: '\n', index: 4 })
        ));
    }

    #[test]
    fn rejects_overlong_input() {
        let raw = "A".repeat(33);
        assert_eq!(
            Symbol::parse(&raw),
            Err(ValidationError::SymbolTooLong { len: 33, max: 32 })
        );
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
    }
}
