use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 按周翻页的查询参数，offset 为相对本周的周数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct WeekOffsetQuery {
    #[serde(default)]
    pub offset: i64,
}

// 按周翻页的响应，附带上一周 / 下一周链接
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct WeekPage<T: TS> {
    pub next_url: String,
    pub prev_url: String,
    pub data: T,
}

impl<T: TS> WeekPage<T> {
    pub fn new(uri_prefix: &str, offset: i64, data: T) -> Self {
        Self {
            next_url: format!("{uri_prefix}?offset={}", offset.saturating_add(1)),
            prev_url: format!("{uri_prefix}?offset={}", offset.saturating_sub(1)),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_page_links() {
        let page = WeekPage::new("/api/v1/students/me/schedule", 0, Vec::<i64>::new());
        assert_eq!(page.next_url, "/api/v1/students/me/schedule?offset=1");
        assert_eq!(page.prev_url, "/api/v1/students/me/schedule?offset=-1");
    }

    #[test]
    fn test_week_page_negative_offset() {
        let page = WeekPage::new("/x", -2, Vec::<i64>::new());
        assert_eq!(page.next_url, "/x?offset=-1");
        assert_eq!(page.prev_url, "/x?offset=-3");
    }
}
