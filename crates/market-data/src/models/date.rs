use chrono::NaiveDate;

/// Build a calendar date from a vendor `YYYY-MM-DD` string.
///
/// The date is assembled from its year/month/day components so no timezone
/// conversion can shift it by a day.
pub fn parse_vendor_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_vendor_date() {
        let date = parse_vendor_date("2024-03-05").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
    }

    #[test]
    fn test_parse_vendor_date_is_calendar_date() {
        assert_eq!(
            parse_vendor_date("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_vendor_date("2024-12-31"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_parse_vendor_date_invalid() {
        assert!(parse_vendor_date("2024-02-30").is_none());
        assert!(parse_vendor_date("2024/03/05").is_none());
        assert!(parse_vendor_date("").is_none());
        assert!(parse_vendor_date("2024-03").is_none());
    }
}
