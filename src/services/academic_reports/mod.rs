pub mod list;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::academic_reports::requests::UpsertAcademicReportsRequest;
use crate::storage::Storage;

pub struct AcademicReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 批量写入学业记录
    pub async fn upsert_reports(
        &self,
        reports: UpsertAcademicReportsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_reports(self, reports, request).await
    }

    // 某节课的全部记录
    pub async fn list_class_reports(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_class_reports(self, class_id, request).await
    }
}
