use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading-day OHLCV record. The symbol is implied by the query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalQuote {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// Restrict vendor rows to `[from, to]` (inclusive), drop duplicate dates and
/// sort ascending.
///
/// Vendors may return unsorted or superset data; when a date appears more
/// than once the last row wins.
pub fn normalize_series(
    rows: impl IntoIterator<Item = HistoricalQuote>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<HistoricalQuote> {
    let by_date: BTreeMap<NaiveDate, HistoricalQuote> = rows
        .into_iter()
        .filter(|row| row.date >= from && row.date <= to)
        .map(|row| (row.date, row))
        .collect();
    by_date.into_values().collect()
}
