//! Admin API 请求 / 响应类型

use serde::{Deserialize, Serialize};

use crate::services::LinkWithHits;

/// `POST /admin/links` 请求体
///
/// 字段缺失时由服务层返回 400，这里全部可选。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostNewLink {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkCreatedResponse {
    pub success: bool,
    pub slug: String,
    pub destination: String,
}

#[derive(Debug, Serialize)]
pub struct LinkDeletedResponse {
    pub success: bool,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub links: Vec<LinkWithHits>,
}

/// 统一错误响应 `{error}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
