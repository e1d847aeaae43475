use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw values an adapter pulls out of a vendor payload before the derived
/// fields are computed.
#[derive(Clone, Debug)]
pub struct PriceSnapshot {
    pub price: Decimal,
    pub previous_close: Decimal,
    pub open: Decimal,
    pub day_high: Decimal,
    pub day_low: Decimal,
    pub volume: u64,
    pub market_cap: Option<Decimal>,
    /// Trading date/time the values refer to
    pub timestamp: DateTime<Utc>,
}

/// Normalized point-in-time quote for one symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Symbol as supplied by the caller
    pub symbol: String,

    /// Last traded price
    pub price: Decimal,

    /// `price - previous_close`
    pub change: Decimal,

    /// `change / previous_close * 100`, absent when the previous close is zero
    pub change_percent: Option<Decimal>,

    pub previous_close: Decimal,
    pub open: Decimal,
    pub day_high: Decimal,
    pub day_low: Decimal,
    pub volume: u64,

    /// Approximate market capitalization, best-effort
    pub market_cap: Option<Decimal>,

    /// Trading date/time the quote represents (not the fetch time)
    pub timestamp: DateTime<Utc>,

    /// Provider that produced the quote (YAHOO, ALPHA_VANTAGE, ...)
    pub source: String,
}

impl Quote {
    /// Build a quote from raw vendor values.
    ///
    /// `change` and `change_percent` are always computed here from the price
    /// and previous close, never copied from vendor-supplied deltas.
    pub fn from_snapshot(symbol: &str, snapshot: PriceSnapshot, source: &str) -> Self {
        let change = snapshot.price - snapshot.previous_close;
        Self {
            symbol: symbol.to_string(),
            price: snapshot.price,
            change,
            change_percent: Self::percent_change(change, snapshot.previous_close),
            previous_close: snapshot.previous_close,
            open: snapshot.open,
            day_high: snapshot.day_high,
            day_low: snapshot.day_low,
            volume: snapshot.volume,
            market_cap: snapshot.market_cap,
            timestamp: snapshot.timestamp,
            source: source.to_string(),
        }
    }

    fn percent_change(change: Decimal, previous_close: Decimal) -> Option<Decimal> {
        if previous_close.is_zero() {
            return None;
        }
        change
            .checked_div(previous_close)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn snapshot(price: Decimal, previous_close: Decimal) -> PriceSnapshot {
        PriceSnapshot {
            price,
            previous_close,
            open: dec!(148.00),
            day_high: dec!(152.00),
            day_low: dec!(147.50),
            volume: 1_000_000,
            market_cap: None,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_derived_fields() {
        let quote = Quote::from_snapshot("AAPL", snapshot(dec!(150.25), dec!(148.50)), "YAHOO");
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.change, dec!(1.75));
        assert_eq!(quote.change, quote.price - quote.previous_close);
        assert_eq!(
            quote.change_percent,
            Some(dec!(1.75) / dec!(148.50) * dec!(100))
        );
    }

    #[test]
    fn test_negative_change() {
        let quote = Quote::from_snapshot("MSFT", snapshot(dec!(90), dec!(100)), "YAHOO");
        assert_eq!(quote.change, dec!(-10));
        assert_eq!(quote.change_percent, Some(dec!(-10)));
    }

    #[test]
    fn test_zero_previous_close_has_no_percent() {
        let quote = Quote::from_snapshot("NEW", snapshot(dec!(10), dec!(0)), "YAHOO");
        assert_eq!(quote.change, dec!(10));
        assert!(quote.change_percent.is_none());
    }

    #[test]
    fn test_symbol_echoed_unmodified() {
        let quote = Quote::from_snapshot("brk.b", snapshot(dec!(1), dec!(1)), "YAHOO");
        assert_eq!(quote.symbol, "brk.b");
    }

    #[test]
    fn test_serializes_camel_case_numbers() {
        let quote = Quote::from_snapshot("AAPL", snapshot(dec!(110), dec!(100)), "YAHOO");
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["previousClose"], serde_json::json!(100.0));
        assert_eq!(json["changePercent"], serde_json::json!(10.0));
        assert_eq!(json["dayHigh"], serde_json::json!(152.0));
        assert!(json["marketCap"].is_null());
    }
}
