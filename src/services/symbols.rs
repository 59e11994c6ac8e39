use std::sync::LazyLock;

use regex::Regex;

// Exchange-suffixed tickers (AAPL.NS, TCS.BSE, ...) must land on the same
// holding row as the bare symbol, whichever variant the caller sends.
static EXCHANGE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(NS|BO|NSE|BSE)$").unwrap());

/// Canonical holding-store key for a ticker: trimmed, uppercased, known
/// exchange suffix stripped. Class tickers like BRK.B are untouched because
/// only the listed suffix tokens match.
pub fn normalize(symbol: &str) -> String {
    let upper = symbol.trim().to_ascii_uppercase();
    EXCHANGE_SUFFIX.replace(&upper, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_known_exchange_suffixes() {
        assert_eq!(normalize("RELIANCE.NS"), "RELIANCE");
        assert_eq!(normalize("tcs.bse"), "TCS");
        assert_eq!(normalize("INFY.BO"), "INFY");
        assert_eq!(normalize("HDFC.NSE"), "HDFC");
    }

    #[test]
    fn uppercases_and_trims() {
        assert_eq!(normalize("  aapl "), "AAPL");
    }

    #[test]
    fn leaves_class_tickers_alone() {
        assert_eq!(normalize("BRK.B"), "BRK.B");
        assert_eq!(normalize("RDS.A"), "RDS.A");
    }

    #[test]
    fn suffix_and_bare_form_collide() {
        assert_eq!(normalize("WIPRO.NS"), normalize("wipro"));
    }
}
