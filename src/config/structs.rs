use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量
/// - storage: 数据目录与文件名
/// - admin: 管理接口密码与 IP 白名单
/// - tracking: 点击日志刷盘与保留策略
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：旧版环境变量 > LT__* 环境变量 > config.toml > 默认值
    /// ENV 前缀：LT，分隔符：__
    /// 示例：LT__SERVER__PORT=9999，LT__ADMIN__ALLOWED_IPS=10.0.0.1,10.0.0.0/8
    ///
    /// 文件或环境变量无法解析时返回错误，不会退回默认配置。
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with(path, None, |key| std::env::var(key).ok())
    }

    /// `load` 的可注入版本：`env_source` 为 None 时读取进程环境变量
    pub fn load_with<F>(
        path: Option<&str>,
        env_source: Option<config::Map<String, String>>,
        legacy_lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("admin.allowed_ips")
                    .source(env_source),
            )
            .build()?;

        let mut loaded: StaticConfig = settings.try_deserialize()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        loaded.apply_legacy_env(legacy_lookup);
        Ok(loaded)
    }

    /// 兼容旧版部署的环境变量：PORT / ADMIN_PASSWORD / ALLOWED_ADMIN_IPS
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => eprintln!("[WARN] Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(password) = lookup("ADMIN_PASSWORD")
            && !password.is_empty()
        {
            self.admin.password = password;
        }

        if let Some(ips) = lookup("ALLOWED_ADMIN_IPS") {
            self.admin.allowed_ips = ips
                .split(',')
                .map(|ip| ip.trim().to_string())
                .filter(|ip| !ip.is_empty())
                .collect();
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_links_file")]
    pub links_file: String,
    #[serde(default = "default_hits_file")]
    pub hits_file: String,
}

impl StorageConfig {
    pub fn links_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.links_file)
    }

    pub fn hits_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.hits_file)
    }
}

/// 管理接口认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_password")]
    pub password: String,
    #[serde(default = "default_allowed_ips")]
    pub allowed_ips: Vec<String>,
}

impl AdminConfig {
    /// 仍在使用出厂密码
    pub fn uses_default_password(&self) -> bool {
        self.password == default_admin_password()
    }
}

/// 点击日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// 最后一次写入后等待多久刷盘（毫秒）
    #[serde(default = "default_flush_debounce_ms")]
    pub flush_debounce_ms: u64,
    /// 定时刷盘间隔（秒），0 表示关闭
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
    /// 内存中最多保留的点击数，0 表示不限制
    #[serde(default)]
    pub max_hits: usize,
    /// 点击保留天数，0 表示永久保留
    #[serde(default)]
    pub retention_days: u64,
    /// stats 接口 recent 字段返回的条数
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl TrackingConfig {
    pub fn flush_debounce(&self) -> Duration {
        Duration::from_millis(self.flush_debounce_ms)
    }

    pub fn flush_interval(&self) -> Option<Duration> {
        (self.flush_interval_secs > 0).then(|| Duration::from_secs(self.flush_interval_secs))
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_links_file() -> String {
    "links.json".to_string()
}

fn default_hits_file() -> String {
    "hits.json".to_string()
}

fn default_admin_password() -> String {
    "changeme".to_string()
}

fn default_allowed_ips() -> Vec<String> {
    vec!["127.0.0.1".to_string()]
}

fn default_flush_debounce_ms() -> u64 {
    5000
}

fn default_flush_interval_secs() -> u64 {
    60
}

fn default_recent_limit() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            links_file: default_links_file(),
            hits_file: default_hits_file(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
            allowed_ips: default_allowed_ips(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            flush_debounce_ms: default_flush_debounce_ms(),
            flush_interval_secs: default_flush_interval_secs(),
            max_hits: 0,
            retention_days: 0,
            recent_limit: default_recent_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_legacy_service() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.admin.password, "changeme");
        assert_eq!(config.admin.allowed_ips, vec!["127.0.0.1"]);
        assert_eq!(config.tracking.flush_debounce(), Duration::from_secs(5));
        assert_eq!(config.tracking.max_hits, 0);
        assert!(config.admin.uses_default_password());
        assert_eq!(
            config.storage.links_path(),
            PathBuf::from("data").join("links.json")
        );
    }

    #[test]
    fn test_legacy_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8081"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("ALLOWED_ADMIN_IPS", "10.0.0.1, 10.0.0.2,,*"),
        ]
        .into_iter()
        .collect();

        let mut config = StaticConfig::default();
        config.apply_legacy_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.admin.password, "s3cret");
        assert_eq!(config.admin.allowed_ips, vec!["10.0.0.1", "10.0.0.2", "*"]);
        assert!(!config.admin.uses_default_password());
    }

    fn env_map(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_with_ip_list() {
        let env = env_map(&[
            ("LT__ADMIN__PASSWORD", "hunter2"),
            ("LT__ADMIN__ALLOWED_IPS", "10.0.0.1,10.0.0.0/8"),
            ("LT__SERVER__PORT", "8088"),
        ]);

        let config =
            StaticConfig::load_with(Some("does-not-exist.toml"), Some(env), |_| None).unwrap();

        assert_eq!(config.admin.password, "hunter2");
        assert_eq!(config.admin.allowed_ips, vec!["10.0.0.1", "10.0.0.0/8"]);
        assert_eq!(config.server.port, 8088);
    }

    #[test]
    fn test_single_ip_env_override() {
        let env = env_map(&[
            ("LT__ADMIN__PASSWORD", "hunter2"),
            ("LT__ADMIN__ALLOWED_IPS", "10.0.0.1"),
        ]);

        let config =
            StaticConfig::load_with(Some("does-not-exist.toml"), Some(env), |_| None).unwrap();

        assert_eq!(config.admin.password, "hunter2");
        assert_eq!(config.admin.allowed_ips, vec!["10.0.0.1"]);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let env = env_map(&[("LT__SERVER__PORT", "not-a-port")]);

        let err = StaticConfig::load_with(Some("does-not-exist.toml"), Some(env), |_| None)
            .unwrap_err();
        assert!(matches!(err, crate::errors::LinktrackError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[admin]\nallowed_ips = 5\n").unwrap();

        let result = StaticConfig::load_with(path.to_str(), Some(env_map(&[])), |_| None);
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_file_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[admin]\npassword = \"from-file\"\nallowed_ips = [\"*\"]\n\n[tracking]\nmax_hits = 10\n",
        )
        .unwrap();

        let config = StaticConfig::load_with(path.to_str(), Some(env_map(&[])), |_| None).unwrap();
        assert_eq!(config.admin.password, "from-file");
        assert_eq!(config.admin.allowed_ips, vec!["*"]);
        assert_eq!(config.tracking.max_hits, 10);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = StaticConfig::default();
        config.apply_legacy_env(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_flush_interval_zero_disables() {
        let tracking = TrackingConfig {
            flush_interval_secs: 0,
            ..Default::default()
        };
        assert!(tracking.flush_interval().is_none());
    }

    #[test]
    fn test_sample_config_is_valid_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.storage.hits_file, "hits.json");
    }
}
