use chrono::{Duration, Local, NaiveDate};

use crate::errors::{PrintlinkerError, Result};

/// 报表与活动使用的日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析 `YYYY-MM-DD` 格式日期
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|e| {
        PrintlinkerError::date_parse(format!("Invalid date '{}': {}", input, e))
    })
}

/// 本地时区的前一天
pub fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

/// 两个闭区间的交集，为空时返回 None
pub fn intersect_windows(
    a: (NaiveDate, NaiveDate),
    b: (NaiveDate, NaiveDate),
) -> Option<(NaiveDate, NaiveDate)> {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    (start <= end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(d("2024-01-15"), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(d(" 2024-12-31 "), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(matches!(
            parse_date("2024/01/15"),
            Err(PrintlinkerError::DateParse(_))
        ));
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_intersect_overlapping() {
        let window = intersect_windows(
            (d("2024-01-10"), d("2024-01-20")),
            (d("2024-01-15"), d("2024-01-25")),
        );
        assert_eq!(window, Some((d("2024-01-15"), d("2024-01-20"))));
    }

    #[test]
    fn test_intersect_disjoint() {
        let window = intersect_windows(
            (d("2024-01-01"), d("2024-01-05")),
            (d("2024-01-10"), d("2024-01-20")),
        );
        assert_eq!(window, None);
    }

    #[test]
    fn test_intersect_single_day() {
        let window = intersect_windows(
            (d("2024-01-01"), d("2024-01-10")),
            (d("2024-01-10"), d("2024-01-20")),
        );
        assert_eq!(window, Some((d("2024-01-10"), d("2024-01-10"))));
    }

    #[test]
    fn test_yesterday_is_before_today() {
        assert!(yesterday() < Local::now().date_naive());
    }
}
