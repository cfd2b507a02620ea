//! Admin API 路由配置

use actix_web::web;

use super::analytics::get_stats;
use super::export::export_csv;
use super::link_crud::{delete_link, get_all_links, post_link};

/// 链接管理路由 `/links`
///
/// - GET /links - 获取所有链接
/// - POST /links - 创建或覆盖链接
/// - DELETE /links/{slug} - 删除链接
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(get_all_links))
        .route("", web::post().to(post_link))
        .route("/{slug}", web::delete().to(delete_link))
}

/// 统计路由 `/stats`
pub fn stats_routes() -> actix_web::Scope {
    web::scope("/stats").route("", web::get().to(get_stats))
}

/// 导出路由 `/export`
pub fn export_routes() -> actix_web::Scope {
    web::scope("/export").route("/csv", web::get().to(export_csv))
}

/// 挂载到 `/admin` 作用域下的全部路由
pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(links_routes())
        .service(stats_routes())
        .service(export_routes());
}
