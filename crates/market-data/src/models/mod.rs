//! Market data models
//!
//! - `quote` - Normalized point-in-time quote (Quote) and the raw values it is built from
//! - `historical` - Daily OHLCV records (HistoricalQuote) and range normalization
//! - `date` - Timezone-free construction of vendor calendar dates

mod date;
mod historical;
mod quote;

pub use date::parse_vendor_date;
pub use historical::{normalize_series, HistoricalQuote};
pub use quote::{PriceSnapshot, Quote};
