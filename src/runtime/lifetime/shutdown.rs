use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::analytics::HitLog;

/// 关闭超时时间（秒）
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待 Ctrl+C
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}

/// 停止点击日志后台任务并在超时内落盘
pub async fn flush_hit_log(hit_log: &HitLog, limit: Duration) {
    match timeout(limit, hit_log.shutdown()).await {
        Ok(Ok(count)) => {
            info!("Hit log flushed on shutdown ({} hits)", count);
        }
        Ok(Err(e)) => {
            error!("Hit log flush failed on shutdown: {:#}", e);
        }
        Err(_) => {
            error!(
                "Hit log flush timed out after {} seconds",
                limit.as_secs()
            );
        }
    }
}
