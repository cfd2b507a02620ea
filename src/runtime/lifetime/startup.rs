use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analytics::{HitLog, HitLogOptions, JsonFileHitSink};
use crate::api::AppState;
use crate::config::StaticConfig;
use crate::services::{AnalyticsService, LinkService};
use crate::storage::FileLinkStore;

pub struct StartupContext {
    pub state: AppState,
    pub hit_log: HitLog,
}

/// 准备服务器启动的上下文
/// 包括数据目录、两个存储和点击日志后台任务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let data_dir = &config.storage.data_dir;
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir))?;

    let store = FileLinkStore::open(config.storage.links_path()).await;
    let sink = Arc::new(JsonFileHitSink::new(config.storage.hits_path()));
    let hit_log = HitLog::load(sink, HitLogOptions::from(&config.tracking))
        .await
        .context("Failed to load hit log")?;
    hit_log.start_background_task();

    if config.admin.uses_default_password() {
        warn!(
            "Admin password is still the default. Set admin.password or ADMIN_PASSWORD before exposing the admin API."
        );
    }
    info!(
        "Admin API allowed IPs: {}",
        config.admin.allowed_ips.join(", ")
    );

    let link_service = Arc::new(LinkService::new(Arc::new(store), hit_log.clone()));
    let analytics_service = Arc::new(AnalyticsService::new(
        hit_log.clone(),
        config.tracking.recent_limit,
    ));
    let state = AppState::new(
        link_service,
        analytics_service,
        Arc::new(config.admin.clone()),
    );

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { state, hit_log })
}
