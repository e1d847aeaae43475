//! Alpha Vantage API response models.

use std::collections::HashMap;

use serde::Deserialize;

/// TIME_SERIES_DAILY response
#[derive(Debug, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    pub time_series: Option<HashMap<String, DailyBar>>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    /// Usually a throttling notice
    #[serde(rename = "Note")]
    pub note: Option<String>,
    /// Throttling or premium-endpoint notices
    #[serde(rename = "Information")]
    pub information: Option<String>,
}

/// One day of the series. Alpha Vantage sends every value as a string.
#[derive(Debug, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_time_series() {
        let json = r#"{
            "Meta Data": {"2. Symbol": "IBM"},
            "Time Series (Daily)": {
                "2024-03-05": {
                    "1. open": "190.00",
                    "2. high": "192.50",
                    "3. low": "189.10",
                    "4. close": "191.20",
                    "5. volume": "4200000"
                }
            }
        }"#;
        let response: TimeSeriesResponse = serde_json::from_str(json).unwrap();
        let series = response.time_series.unwrap();
        assert_eq!(series["2024-03-05"].close, "191.20");
        assert!(response.note.is_none());
    }

    #[test]
    fn test_deserialize_throttle_note() {
        let json = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let response: TimeSeriesResponse = serde_json::from_str(json).unwrap();
        assert!(response.time_series.is_none());
        assert!(response.note.unwrap().contains("call frequency"));
    }
}
