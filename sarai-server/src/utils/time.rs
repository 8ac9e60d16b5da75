//! 时间工具函数 — 日期与时间戳转换
//!
//! 餐券的有效日是日历日 (`YYYY-MM-DD` 字符串)，入住/退房窗口是
//! `i64` Unix millis。所有转换统一在这里，repository 层不做解析。

use chrono::NaiveDate;

use crate::utils::{AppError, AppResult};

const DATE_FMT: &str = "%Y-%m-%d";

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FMT)
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 → YYYY-MM-DD 字符串
pub fn date_str(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// 今天 (UTC) 的 YYYY-MM-DD 字符串
pub fn today_str() -> String {
    date_str(chrono::Utc::now().date_naive())
}

/// Unix millis → YYYY-MM-DD 字符串 (UTC)
pub fn millis_to_date_str(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| date_str(dt.date_naive()))
        .unwrap_or_else(today_str)
}

/// 闭区间 [start, end] 内的所有日历日
///
/// start > end 时返回验证错误。
pub fn date_range_inclusive(start: &str, end: &str) -> AppResult<Vec<String>> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
        return Err(AppError::validation(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }

    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(date_str(current));
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2026-08-28").is_ok());
        assert!(parse_date("28-08-2026").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_date_range_inclusive() {
        let days = date_range_inclusive("2026-08-28", "2026-09-02").unwrap();
        assert_eq!(days.len(), 6);
        assert_eq!(days.first().unwrap(), "2026-08-28");
        assert_eq!(days.last().unwrap(), "2026-09-02");

        let one = date_range_inclusive("2026-08-28", "2026-08-28").unwrap();
        assert_eq!(one, vec!["2026-08-28"]);

        assert!(date_range_inclusive("2026-09-02", "2026-08-28").is_err());
    }

    #[test]
    fn test_millis_to_date_str() {
        // 2024-01-01 00:00:00 UTC
        assert_eq!(millis_to_date_str(1_704_067_200_000), "2024-01-01");
    }
}
