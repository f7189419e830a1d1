//! 公共工具模块

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

/// 解析 IANA 时区名（如 "Asia/Kolkata"）
pub fn parse_timezone(name: &str) -> anyhow::Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("无效的时区 '{}': {}", name, e))
}

/// 将 UTC 时刻转换到指定时区，输出带偏移量的 ISO-8601 字符串
///
/// 精确到微秒，偏移量始终以 `+HH:MM` 形式给出（不使用 `Z`）
pub fn format_in_zone(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// 当前时刻在指定时区下的时间戳
pub fn now_in_zone(tz: Tz) -> String {
    format_in_zone(Utc::now(), tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Asia/Kolkata").unwrap(), chrono_tz::Asia::Kolkata);
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_format_in_kolkata() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            format_in_zone(instant, chrono_tz::Asia::Kolkata),
            "2024-01-01T05:30:00.000000+05:30"
        );
    }

    #[test]
    fn test_format_follows_dst_rules() {
        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let tz = chrono_tz::Europe::Berlin;
        assert!(format_in_zone(summer, tz).ends_with("+02:00"));
        assert!(format_in_zone(winter, tz).ends_with("+01:00"));
    }

    #[test]
    fn test_now_in_zone_is_rfc3339() {
        let ts = now_in_zone(chrono_tz::Asia::Kolkata);
        let parsed = chrono::DateTime::parse_from_rfc3339(&ts).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }
}
