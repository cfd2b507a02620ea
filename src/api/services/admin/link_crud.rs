//! Admin API 链接 CRUD 操作

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::{info, trace, warn};

use crate::services::LinkService;

use super::helpers::error_from_linktrack;
use super::types::{LinkCreatedResponse, LinkDeletedResponse, LinksResponse, PostNewLink};

/// 获取所有链接及其跳转次数
pub async fn get_all_links(links: web::Data<Arc<LinkService>>) -> impl Responder {
    trace!("Admin API: request to list all links");

    let all = links.list_links().await;
    info!("Admin API: returning {} links", all.len());

    HttpResponse::Ok().json(LinksResponse { links: all })
}

/// 创建或覆盖链接
pub async fn post_link(
    body: web::Json<PostNewLink>,
    links: web::Data<Arc<LinkService>>,
) -> impl Responder {
    let body = body.into_inner();

    match links
        .create_link(body.slug.as_deref(), body.destination.as_deref())
        .await
    {
        Ok(link) => HttpResponse::Ok().json(LinkCreatedResponse {
            success: true,
            slug: link.slug,
            destination: link.destination,
        }),
        Err(e) => {
            warn!("Admin API: failed to create link: {}", e);
            error_from_linktrack(&e)
        }
    }
}

/// 删除链接
pub async fn delete_link(
    path: web::Path<String>,
    links: web::Data<Arc<LinkService>>,
) -> impl Responder {
    let slug = path.into_inner();

    match links.delete_link(&slug).await {
        Ok(()) => HttpResponse::Ok().json(LinkDeletedResponse {
            success: true,
            slug,
        }),
        Err(e) => {
            info!("Admin API: delete failed for {}: {}", slug, e);
            error_from_linktrack(&e)
        }
    }
}
