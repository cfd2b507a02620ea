use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::trace;

use crate::services::{AnalyticsService, LinkService};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub links: usize,
    pub hits: usize,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        links: web::Data<Arc<LinkService>>,
        analytics: web::Data<Arc<AnalyticsService>>,
    ) -> impl Responder {
        trace!("Received health check request");
        HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            links: links.link_count().await,
            hits: analytics.hit_count(),
        })
    }
}

/// 健康检查路由 `/health`
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check));
}
