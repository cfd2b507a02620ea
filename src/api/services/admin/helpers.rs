//! Admin API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::errors::LinktrackError;

use super::types::ErrorResponse;

/// 构建错误响应 `{error: message}`
pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: message.into(),
    })
}

/// 从 LinktrackError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_from_linktrack(err: &LinktrackError) -> HttpResponse {
    error_response(err.http_status(), err.message())
}
