use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::classes::entities::ClassRead;

// 成绩等级，从差到好
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "academic_report.ts")]
pub enum Grade {
    Terribly,
    Awfully,
    Unsatisfactorily,
    Satisfactorily,
    Good,
    Excellent,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Terribly => "terribly",
            Grade::Awfully => "awfully",
            Grade::Unsatisfactorily => "unsatisfactorily",
            Grade::Satisfactorily => "satisfactorily",
            Grade::Good => "good",
            Grade::Excellent => "excellent",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terribly" => Ok(Grade::Terribly),
            "awfully" => Ok(Grade::Awfully),
            "unsatisfactorily" => Ok(Grade::Unsatisfactorily),
            "satisfactorily" => Ok(Grade::Satisfactorily),
            "good" => Ok(Grade::Good),
            "excellent" => Ok(Grade::Excellent),
            _ => Err(format!("Invalid grade: {s}")),
        }
    }
}

// 学业记录：某个学生在某节课上的出勤与成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic_report.ts")]
pub struct AcademicReport {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub is_attended: bool,
    pub grade: Option<Grade>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 展示视图
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic_report.ts")]
pub struct AcademicReportRead {
    pub id: i64,
    /// "Surname Name"
    pub student: String,
    pub is_attended: bool,
    pub grade: Option<Grade>,
    pub lesson: ClassRead,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_ordering() {
        assert!(Grade::Terribly < Grade::Awfully);
        assert!(Grade::Satisfactorily < Grade::Good);
        assert!(Grade::Good < Grade::Excellent);
    }

    #[test]
    fn test_grade_parse_and_display() {
        for grade in [
            Grade::Terribly,
            Grade::Awfully,
            Grade::Unsatisfactorily,
            Grade::Satisfactorily,
            Grade::Good,
            Grade::Excellent,
        ] {
            assert_eq!(grade.to_string().parse::<Grade>().unwrap(), grade);
        }
        assert_eq!("EXCELLENT".parse::<Grade>().unwrap(), Grade::Excellent);
        assert!("perfect".parse::<Grade>().is_err());
    }

    #[test]
    fn test_grade_serde_snake_case() {
        let json = serde_json::to_string(&Grade::Unsatisfactorily).unwrap();
        assert_eq!(json, "\"unsatisfactorily\"");
    }
}
