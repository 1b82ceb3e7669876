//! 时间处理模块
//!
//! 服务端以 ISO 8601 字符串返回时间（`submitted_at`、`created_at`），
//! 根据配置可能带或不带时区偏移。此模块负责宽松解析与展示格式化。

use chrono::{DateTime, NaiveDateTime, Utc};

/// 月份缩写，与界面语言保持一致
const MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// 解析服务端时间字符串
///
/// 先按 RFC 3339 解析；失败时按无时区的本地格式解析并视为 UTC。
/// 返回 None 如果两种格式都不匹配
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 格式化为 `12 mars 2025, 14:30`
///
/// 无法解析时返回 "Non spécifiée"
pub fn display_datetime(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => format!("{}, {}", display_day(&dt), dt.format("%H:%M")),
        None => "Non spécifiée".to_string(),
    }
}

/// 仅日期部分，用于图表横轴
pub fn display_date(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => display_day(&dt),
        None => "Non spécifiée".to_string(),
    }
}

fn display_day(dt: &DateTime<Utc>) -> String {
    use chrono::Datelike;
    let month = MONTHS[dt.month0() as usize];
    format!("{} {} {}", dt.day(), month, dt.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_offset_timestamps_into_utc() {
        let dt = parse_timestamp("2025-03-12T15:30:00.123456+01:00").unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn parses_naive_timestamps() {
        assert!(parse_timestamp("2025-03-12T14:30:00.123456").is_some());
        assert!(parse_timestamp("2025-03-12 14:30:00").is_some());
        assert!(parse_timestamp("hier").is_none());
    }

    #[test]
    fn display_uses_french_month_names() {
        assert_eq!(display_datetime("2025-03-12T14:30:00Z"), "12 mars 2025, 14:30");
        assert_eq!(display_date("2024-12-01T08:00:00Z"), "1 déc. 2024");
        assert_eq!(display_datetime(""), "Non spécifiée");
    }
}
