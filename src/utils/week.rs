use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// 允许的周偏移范围（约一百年）
pub const MAX_WEEK_OFFSET: i64 = 5_200;

/// 按周偏移计算 [周一 00:00, 下周一 00:00) 的 UTC 时间窗口
pub fn week_window(today: NaiveDate, offset: i64) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    if !(-MAX_WEEK_OFFSET..=MAX_WEEK_OFFSET).contains(&offset) {
        return None;
    }
    let day = today.checked_add_signed(Duration::days(7 * offset))?;
    let monday = day.checked_sub_signed(Duration::days(
        i64::from(day.weekday().num_days_from_monday()),
    ))?;
    let start = monday.and_hms_opt(0, 0, 0)?.and_utc();
    let end = start.checked_add_signed(Duration::days(7))?;
    Some((start, end))
}

/// 以今天（UTC）为基准
pub fn current_week_window(offset: i64) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    week_window(Utc::now().date_naive(), offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_starts_on_monday() {
        // 2024-03-28 是周四
        let (start, end) = week_window(date(2024, 3, 28), 0).unwrap();
        assert_eq!(start.date_naive(), date(2024, 3, 25));
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(end.date_naive(), date(2024, 4, 1));
        assert_eq!(end - start, Duration::days(7));
    }

    #[test]
    fn test_monday_and_sunday_map_to_same_week() {
        let from_monday = week_window(date(2024, 3, 25), 0).unwrap();
        let from_sunday = week_window(date(2024, 3, 31), 0).unwrap();
        assert_eq!(from_monday, from_sunday);
    }

    #[test]
    fn test_offsets() {
        let (next, _) = week_window(date(2024, 3, 28), 1).unwrap();
        assert_eq!(next.date_naive(), date(2024, 4, 1));
        let (prev, _) = week_window(date(2024, 3, 28), -1).unwrap();
        assert_eq!(prev.date_naive(), date(2024, 3, 18));
        // 跨年
        let (start, _) = week_window(date(2024, 12, 30), 0).unwrap();
        assert_eq!(start.date_naive(), date(2024, 12, 30));
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(week_window(date(2024, 3, 28), MAX_WEEK_OFFSET + 1).is_none());
        assert!(week_window(date(2024, 3, 28), -MAX_WEEK_OFFSET - 1).is_none());
        assert!(week_window(date(2024, 3, 28), i64::MIN).is_none());
        assert!(week_window(date(2024, 3, 28), i64::MAX).is_none());
        assert!(week_window(date(2024, 3, 28), -MAX_WEEK_OFFSET).is_some());
    }
}
