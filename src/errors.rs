use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum LinktrackError {
    Config(String),
    FileOperation(String),
    Forbidden(String),
    NotFound(String),
    Serialization(String),
    Unauthorized(String),
    Validation(String),
}

impl LinktrackError {
    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinktrackError::Config(_) => "Configuration Error",
            LinktrackError::FileOperation(_) => "File Operation Error",
            LinktrackError::Forbidden(_) => "Forbidden",
            LinktrackError::NotFound(_) => "Resource Not Found",
            LinktrackError::Serialization(_) => "Serialization Error",
            LinktrackError::Unauthorized(_) => "Unauthorized",
            LinktrackError::Validation(_) => "Validation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinktrackError::Config(msg) => msg,
            LinktrackError::FileOperation(msg) => msg,
            LinktrackError::Forbidden(msg) => msg,
            LinktrackError::NotFound(msg) => msg,
            LinktrackError::Serialization(msg) => msg,
            LinktrackError::Unauthorized(msg) => msg,
            LinktrackError::Validation(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinktrackError::Validation(_) => StatusCode::BAD_REQUEST,
            LinktrackError::NotFound(_) => StatusCode::NOT_FOUND,
            LinktrackError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LinktrackError::Forbidden(_) => StatusCode::FORBIDDEN,
            LinktrackError::Config(_)
            | LinktrackError::FileOperation(_)
            | LinktrackError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {}\n  {}",
            "[ERROR]".red().bold(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinktrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinktrackError {}

// 便捷的构造函数
impl LinktrackError {
    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinktrackError::FileOperation(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        LinktrackError::Forbidden(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinktrackError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinktrackError::Serialization(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinktrackError::Unauthorized(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinktrackError::Validation(msg.into())
    }
}

impl From<std::io::Error> for LinktrackError {
    fn from(err: std::io::Error) -> Self {
        LinktrackError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinktrackError {
    fn from(err: serde_json::Error) -> Self {
        LinktrackError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for LinktrackError {
    fn from(err: csv::Error) -> Self {
        LinktrackError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for LinktrackError {
    fn from(err: config::ConfigError) -> Self {
        LinktrackError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinktrackError>;
