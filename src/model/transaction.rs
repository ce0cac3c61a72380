use crate::model::{Amount, YearMonth};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a single cleaned row from the travel log.
///
/// Every label is either a non-empty string or `None`; there is no such thing as an empty label.
/// Numeric fields are never absent because unparseable or missing values coerce to zero.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) date: Option<NaiveDate>,
    pub(crate) cost: Amount,
    pub(crate) point_spend: Decimal,
    pub(crate) point_cash_value: Amount,
    pub(crate) category: Option<String>,
    pub(crate) trip_name: Option<String>,
    pub(crate) merchant: Option<String>,
}

impl Transaction {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn cost(&self) -> Amount {
        self.cost
    }

    pub fn point_spend(&self) -> Decimal {
        self.point_spend
    }

    pub fn point_cash_value(&self) -> Amount {
        self.point_cash_value
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn trip_name(&self) -> Option<&str> {
        self.trip_name.as_deref()
    }

    pub fn merchant(&self) -> Option<&str> {
        self.merchant.as_deref()
    }

    /// Cash cost plus the cash value of the points spent.
    pub fn total_value(&self) -> Amount {
        self.cost + self.point_cash_value
    }

    pub fn month(&self) -> Option<YearMonth> {
        self.date.map(YearMonth::from)
    }
}

/// Date layouts tried in order. The spreadsheet hands back whatever the cell's number format
/// renders, so several layouts show up in practice. Month-first layouts come before year-first
/// ones so that `1/5/24` is never read as year 1.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// `%Y` accepts any number of digits, so a short year field can still match. Years before 1000
/// only come from such a misread and are rejected.
const MIN_YEAR: i32 = 1000;

/// Parses a calendar date from a worksheet cell. Returns `None` for anything that is not a
/// recognizable date; times of day are discarded.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let plausible = |d: &NaiveDate| d.year() >= MIN_YEAR;
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(plausible)
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .find(plausible)
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
                .filter(plausible)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = ymd(2024, 1, 5);
        for s in [
            "2024-01-05",
            "2024/01/05",
            "1/5/2024",
            "01/05/2024",
            "1/5/24",
            "5 Jan 2024",
            "Jan 5, 2024",
            "January 5, 2024",
            "2024-01-05 13:45:00",
            "2024-01-05T08:00:00",
            "2024-01-05T08:00:00+02:00",
            "1/5/2024 9:15:30 AM",
            "  2024-01-05  ",
        ] {
            assert_eq!(parse_date(s), Some(expected), "failed to parse '{s}'");
        }
    }

    #[test]
    fn test_two_digit_years_are_not_year_one() {
        assert_eq!(parse_date("1/5/24"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2/3/24"), Some(ymd(2024, 2, 3)));
        assert_eq!(parse_date("12/31/99"), Some(ymd(1999, 12, 31)));
        assert_eq!(parse_date("24-01-05"), None);
        assert_eq!(parse_date("0024-01-05"), None);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("13/45/2024"), None);
    }

    #[test]
    fn test_total_value() {
        let t = Transaction {
            cost: Amount::from_str("$10.50").unwrap(),
            point_cash_value: Amount::from_str("4.50").unwrap(),
            ..Default::default()
        };
        assert_eq!(t.total_value().value(), Decimal::from(15));
    }

    #[test]
    fn test_month() {
        let t = Transaction {
            date: Some(ymd(2024, 3, 31)),
            ..Default::default()
        };
        assert_eq!(t.month(), Some(YearMonth::new(2024, 3)));
        assert_eq!(Transaction::default().month(), None);
    }
}
