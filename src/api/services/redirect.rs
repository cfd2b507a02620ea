//! 跳转与像素追踪路由

use std::sync::Arc;

use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, LOCATION, PRAGMA};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::debug;

use crate::analytics::track;
use crate::api::constants::{PIXEL_CACHE_CONTROL, PIXEL_PNG};
use crate::services::{AnalyticsService, LinkService};
use crate::storage::HitType;

pub struct RedirectService;

impl RedirectService {
    /// `GET /l/{slug}`：记录跳转并 302，未知短链 404 且不记录
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        links: web::Data<Arc<LinkService>>,
        analytics: web::Data<Arc<AnalyticsService>>,
    ) -> impl Responder {
        let slug = path.into_inner();

        match links.resolve(&slug).await {
            Some(destination) => {
                track(analytics.hit_log(), HitType::Redirect, &slug, &req);
                HttpResponse::Found()
                    .insert_header((LOCATION, destination))
                    .finish()
            }
            None => {
                debug!("Redirect link not found: {}", slug);
                Self::not_found_response()
            }
        }
    }

    /// `GET /p/{slug}`：总是记录，返回 1×1 透明 PNG
    pub async fn handle_pixel(
        req: HttpRequest,
        path: web::Path<String>,
        analytics: web::Data<Arc<AnalyticsService>>,
    ) -> impl Responder {
        let slug = path.into_inner();
        track(analytics.hit_log(), HitType::Pixel, &slug, &req);

        HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "image/png"))
            .insert_header((CACHE_CONTROL, PIXEL_CACHE_CONTROL))
            .insert_header((EXPIRES, "0"))
            .insert_header((PRAGMA, "no-cache"))
            .body(PIXEL_PNG)
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::NotFound()
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .body("Link not found")
    }
}

/// 追踪路由：`/l/{slug}` 与 `/p/{slug}`
pub fn tracking_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/l/{slug}", web::get().to(RedirectService::handle_redirect))
        .route("/p/{slug}", web::get().to(RedirectService::handle_pixel));
}
