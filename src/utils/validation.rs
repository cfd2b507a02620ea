//! 管理接口输入校验
//!
//! - slug 会出现在 `/l/{slug}` 路径里，只允许安全的路径字符
//! - destination 只允许 http(s)，拒绝 javascript: 等危险协议

use url::Url;

/// slug 最大长度
pub const MAX_SLUG_LEN: usize = 128;

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 检查 slug：ASCII 字母数字以及 `-` `_` `.`，不能是 `.` 或 `..`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug != "."
        && slug != ".."
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// 检查跳转目标地址，返回面向用户的错误信息
pub fn validate_destination(destination: &str) -> Result<(), String> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err("destination cannot be empty".to_string());
    }

    let lower = destination.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| lower.starts_with(**p)) {
        return Err(format!("destination protocol not allowed: {}", proto));
    }

    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return Err("destination must start with http:// or https://".to_string());
    }

    Url::parse(destination)
        .map(|_| ())
        .map_err(|e| format!("invalid destination URL: {}", e))
}
