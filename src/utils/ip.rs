//! IP 地址处理工具
//!
//! 提供统一的客户端 IP 提取功能以及管理接口的 IP 白名单匹配：
//! - X-Forwarded-For（取第一个）> X-Real-IP > 连接地址
//! - 白名单支持单 IP、CIDR 和通配符 `*`

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 无法确定客户端地址时使用的占位值
pub const UNKNOWN_IP: &str = "unknown";

/// 从请求提取客户端 IP
pub fn extract_client_ip(req: &HttpRequest) -> String {
    client_ip_from_parts(req.headers(), req.peer_addr())
}

/// 从请求头和连接地址推导客户端 IP
pub fn client_ip_from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    extract_forwarded_ip_from_headers(headers)
        .or_else(|| peer.map(|addr| addr.ip().to_canonical().to_string()))
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    // 优先 X-Forwarded-For（取第一个，即原始客户端 IP）
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            // 其次 X-Real-IP
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// 检查 IP 是否命中白名单
///
/// 白名单项可以是 `*`、单个 IP 或 CIDR；IPv4-mapped IPv6 地址按 IPv4 比较。
pub fn is_ip_allowed(ip: &str, allowlist: &[String]) -> bool {
    let parsed = ip.parse::<IpAddr>().ok().map(|addr| addr.to_canonical());

    allowlist.iter().any(|entry| {
        let entry = entry.trim();
        if entry == "*" || entry == ip {
            return true;
        }
        let Some(addr) = parsed else {
            return false;
        };
        if entry.contains('/') {
            ip_in_cidr(&addr, entry)
        } else {
            entry
                .parse::<IpAddr>()
                .map(|allowed| allowed.to_canonical() == addr)
                .unwrap_or(false)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}
