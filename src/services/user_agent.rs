//! UserAgent 解析
//!
//! 使用 woothee 把 UA 字符串归类为浏览器 / 操作系统 / 设备类型。

use woothee::parser::Parser;

const UNKNOWN: &str = "UNKNOWN";

/// 解析后的客户端信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// 如 `Chrome 120.0.0.0`，无法识别时为 `Unknown`
    pub browser: String,
    /// 如 `Mac OSX 10.15.7`，无法识别时为 `Unknown`
    pub os: String,
    /// desktop / mobile / tablet / console / bot
    pub device: String,
}

fn known(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != UNKNOWN).then_some(value)
}

fn name_with_version(name: &str, version: &str) -> String {
    let name = known(name).unwrap_or("Unknown");
    match known(version) {
        Some(version) => format!("{} {}", name, version),
        None => name.to_string(),
    }
}

fn device_type(category: &str, os: &str) -> &'static str {
    match category {
        "smartphone" if os == "iPad" || os.contains("Tablet") => "tablet",
        "smartphone" | "mobilephone" => "mobile",
        "appliance" => "console",
        "crawler" => "bot",
        _ => "desktop",
    }
}

/// 解析 UserAgent 字符串
pub fn parse_user_agent(user_agent: &str) -> ClientInfo {
    let parser = Parser::new();
    let Some(result) = parser.parse(user_agent) else {
        return ClientInfo {
            browser: "Unknown".to_string(),
            os: "Unknown".to_string(),
            device: "desktop".to_string(),
        };
    };

    ClientInfo {
        browser: name_with_version(result.name, result.version),
        os: name_with_version(result.os, &result.os_version),
        device: device_type(result.category, result.os).to_string(),
    }
}
