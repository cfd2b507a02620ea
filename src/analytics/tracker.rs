//! 从请求构造点击记录并写入点击日志

use actix_web::HttpRequest;
use chrono::{DateTime, Utc};
use tracing::info;

use super::HitLog;
use crate::services::user_agent::parse_user_agent;
use crate::storage::{Hit, HitType};
use crate::utils::ip::extract_client_ip;

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
}

/// 从请求推导点击记录（不写入日志）
pub fn build_hit(kind: HitType, slug: &str, req: &HttpRequest, timestamp: DateTime<Utc>) -> Hit {
    let user_agent = header(req, "user-agent");
    let client = parse_user_agent(user_agent.unwrap_or_default());

    Hit {
        kind,
        slug: slug.to_string(),
        ip: extract_client_ip(req),
        timestamp,
        user_agent: user_agent.unwrap_or("Unknown").to_string(),
        browser: client.browser,
        os: client.os,
        device: client.device,
        referer: header(req, "referer")
            .or_else(|| header(req, "referrer"))
            .unwrap_or("Direct")
            .to_string(),
        accept_language: header(req, "accept-language")
            .unwrap_or("Unknown")
            .to_string(),
    }
}

/// 记录一次点击
pub fn track(log: &HitLog, kind: HitType, slug: &str, req: &HttpRequest) -> Hit {
    let hit = build_hit(kind, slug, req, Utc::now());

    info!(
        "[{}] {} - {} - {} on {} - Referer: {}",
        kind.as_str().to_uppercase(),
        hit.slug,
        hit.ip,
        hit.browser,
        hit.os,
        hit.referer
    );

    log.append(hit.clone());
    hit
}
