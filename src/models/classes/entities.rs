use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课节
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Class {
    pub id: i64,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub group_id: i64,
    pub teacher_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(self.duration_minutes as i64)
    }
}

// 课节展示视图：关联对象只展示名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassRead {
    pub id: i64,
    pub group: String,
    pub subject: Option<String>,
    /// "Surname N."
    pub teacher: Option<String>,
    pub classroom: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

// 某一天的课表，day: 0 = 周一 ... 6 = 周日
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct DailySchedule {
    pub day: u32,
    pub classes: Vec<ClassRead>,
}

impl DailySchedule {
    /// 按星期几聚合课节，只返回有课的日子，按周一到周日排序，当天按开始时间排序
    pub fn group_by_weekday(mut classes: Vec<ClassRead>) -> Vec<DailySchedule> {
        classes.sort_by_key(|c| (c.starts_at, c.id));

        let mut days: Vec<DailySchedule> = Vec::new();
        for class in classes {
            let day = class.starts_at.weekday().num_days_from_monday();
            match days.iter_mut().find(|d| d.day == day) {
                Some(schedule) => schedule.classes.push(class),
                None => days.push(DailySchedule {
                    day,
                    classes: vec![class],
                }),
            }
        }
        days.sort_by_key(|d| d.day);
        days
    }
}

/// 教师短名："Ivanov I."
pub fn teacher_short_name(surname: &str, name: &str) -> String {
    match name.chars().next() {
        Some(initial) => format!("{surname} {initial}."),
        None => surname.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn class_at(id: i64, y: i32, m: u32, d: u32, h: u32) -> ClassRead {
        let starts_at = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        ClassRead {
            id,
            group: "G-1".into(),
            subject: Some("Math".into()),
            teacher: Some("Ivanov I.".into()),
            classroom: None,
            starts_at,
            ends_at: starts_at + Duration::minutes(90),
        }
    }

    #[test]
    fn test_group_by_weekday_orders_days_and_classes() {
        // 2024-03-25 是周一
        let classes = vec![
            class_at(3, 2024, 3, 27, 12), // 周三
            class_at(1, 2024, 3, 25, 10), // 周一
            class_at(2, 2024, 3, 25, 8),  // 周一更早
            class_at(4, 2024, 3, 31, 9),  // 周日
        ];

        let days = DailySchedule::group_by_weekday(classes);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day, 0);
        assert_eq!(
            days[0].classes.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(days[1].day, 2);
        assert_eq!(days[2].day, 6);
    }

    #[test]
    fn test_group_by_weekday_empty() {
        assert!(DailySchedule::group_by_weekday(Vec::new()).is_empty());
    }

    #[test]
    fn test_teacher_short_name() {
        assert_eq!(teacher_short_name("Ivanov", "Ivan"), "Ivanov I.");
        assert_eq!(teacher_short_name("Петров", "Алексей"), "Петров А.");
        assert_eq!(teacher_short_name("Solo", ""), "Solo");
    }

    #[test]
    fn test_class_ends_at() {
        let starts_at = Utc.with_ymd_and_hms(2024, 3, 25, 9, 0, 0).unwrap();
        let class = Class {
            id: 1,
            starts_at,
            duration_minutes: 90,
            group_id: 1,
            teacher_id: None,
            subject_id: None,
            classroom_id: None,
            created_at: starts_at,
            updated_at: starts_at,
        };
        assert_eq!(
            class.ends_at(),
            Utc.with_ymd_and_hms(2024, 3, 25, 10, 30, 0).unwrap()
        );
    }
}
