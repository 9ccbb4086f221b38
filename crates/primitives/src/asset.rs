//! Entity identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Listing venue encoded in the identifier suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Exchange {
    /// Shanghai Stock Exchange.
    #[display("SH")]
    #[serde(rename = "SH")]
    Shanghai,
    /// Shenzhen Stock Exchange.
    #[display("SZ")]
    #[serde(rename = "SZ")]
    Shenzhen,
    /// Beijing Stock Exchange.
    #[display("BJ")]
    #[serde(rename = "BJ")]
    Beijing,
    /// Vendor-computed index.
    #[display("WI")]
    #[serde(rename = "WI")]
    Wind,
}

impl Exchange {
    /// Parse an exchange from its suffix code.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "SH" => Some(Self::Shanghai),
            "SZ" => Some(Self::Shenzhen),
            "BJ" => Some(Self::Beijing),
            "WI" => Some(Self::Wind),
            _ => None,
        }
    }

    /// Exchange of an identifier such as `600000.SH`.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        symbol.rsplit_once('.').and_then(|(_, suffix)| Self::from_suffix(suffix))
    }
}

/// Instrument identifier such as `600000.SH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Create a new symbol.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Code part before the exchange suffix.
    #[must_use]
    pub fn code(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(code, _)| code)
    }

    /// Exchange parsed from the suffix, if recognised.
    #[must_use]
    pub fn exchange(&self) -> Option<Exchange> {
        Exchange::from_symbol(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn symbol_from_str() {
        let sym: Symbol = "600000.SH".into();
        assert_eq!(sym.as_str(), "600000.SH");
        assert_eq!(sym.code(), "600000");
    }

    #[rstest]
    #[case("600000.SH", Some(Exchange::Shanghai))]
    #[case("000001.SZ", Some(Exchange::Shenzhen))]
    #[case("8841388.WI", Some(Exchange::Wind))]
    #[case("AAPL.O", None)]
    #[case("NOSUFFIX", None)]
    fn exchange_from_symbol(#[case] raw: &str, #[case] expected: Option<Exchange>) {
        assert_eq!(Symbol::new(raw).exchange(), expected);
    }

    #[test]
    fn exchange_display_round_trips_suffix() {
        assert_eq!(Exchange::Shenzhen.to_string(), "SZ");
        assert_eq!(Exchange::from_suffix("SZ"), Some(Exchange::Shenzhen));
    }

    #[test]
    fn exchange_serializes_as_suffix() {
        assert_eq!(serde_json::to_string(&Exchange::Shanghai).unwrap(), "\"SH\"");
        let parsed: Exchange = serde_json::from_str("\"SZ\"").unwrap();
        assert_eq!(parsed, Exchange::Shenzhen);
    }
}
