//! Admin API CSV 导出

use std::sync::Arc;

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, Responder, web};
use tracing::{error, info};

use crate::analytics::HitFilter;
use crate::services::AnalyticsService;

use super::helpers::error_from_linktrack;

/// 导出过滤后的点击为 CSV 附件
pub async fn export_csv(
    query: web::Query<HitFilter>,
    analytics: web::Data<Arc<AnalyticsService>>,
) -> impl Responder {
    match analytics.export_csv(&query) {
        Ok(csv) => {
            let filename = format!("hits-{}.csv", chrono::Utc::now().timestamp_millis());
            info!("Admin API: exporting {} bytes as {}", csv.len(), filename);

            HttpResponse::Ok()
                .insert_header((CONTENT_TYPE, "text/csv"))
                .insert_header((
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(csv)
        }
        Err(e) => {
            error!("Admin API: CSV export failed: {}", e);
            error_from_linktrack(&e)
        }
    }
}
