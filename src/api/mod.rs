//! HTTP 接口层
//!
//! 路由：
//! - `/health`
//! - `/l/{slug}`、`/p/{slug}`（追踪）
//! - `/admin/*`（需认证）

pub mod constants;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::{HttpResponse, error::InternalError, web};
use tracing::debug;

use crate::config::AdminConfig;
use crate::services::{AnalyticsService, LinkService};

use self::middleware::AdminAuth;
use self::services::admin::ErrorResponse;
use self::services::{admin_routes, health_routes, tracking_routes};

/// 路由处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkService>,
    pub analytics: Arc<AnalyticsService>,
    pub admin: Arc<AdminConfig>,
}

impl AppState {
    pub fn new(
        links: Arc<LinkService>,
        analytics: Arc<AnalyticsService>,
        admin: Arc<AdminConfig>,
    ) -> Self {
        Self {
            links,
            analytics,
            admin,
        }
    }

    /// 注册全部路由，供 `App::configure` 使用
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.links.clone()))
            .app_data(web::Data::new(self.analytics.clone()))
            .app_data(json_config())
            .configure(health_routes)
            .configure(tracking_routes)
            .service(
                web::scope("/admin")
                    .wrap(AdminAuth::new(self.admin.clone()))
                    .configure(admin_routes),
            );
    }
}

/// 请求体 JSON 解析失败时返回 400 `{error}`
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            debug!("Rejected JSON body: {}", err);
            let response = HttpResponse::BadRequest().json(ErrorResponse {
                error: err.to_string(),
            });
            InternalError::from_response(err, response).into()
        })
}
