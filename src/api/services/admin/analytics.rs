//! Admin API 统计端点

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

use crate::analytics::HitFilter;
use crate::services::AnalyticsService;

/// 过滤后的点击聚合统计
pub async fn get_stats(
    query: web::Query<HitFilter>,
    analytics: web::Data<Arc<AnalyticsService>>,
) -> impl Responder {
    trace!("Admin API: stats request with filter {:?}", query);
    HttpResponse::Ok().json(analytics.stats(&query))
}
