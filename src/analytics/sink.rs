use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::storage::{Hit, backup_corrupt_file, write_json_atomic};

/// 点击日志持久化后端
///
/// `save` 总是收到完整的日志快照，实现方负责整体覆盖写入。
#[async_trait::async_trait]
pub trait HitSink: Send + Sync {
    /// 启动时加载已持久化的点击
    async fn load(&self) -> anyhow::Result<Vec<Hit>>;

    /// 覆盖写入全部点击
    async fn save(&self, hits: &[Hit]) -> anyhow::Result<()>;
}

/// 写入 JSON 数组文件（hits.json）
pub struct JsonFileHitSink {
    file_path: PathBuf,
}

impl JsonFileHitSink {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl HitSink for JsonFileHitSink {
    /// 读取 hits.json
    ///
    /// 不符合格式的记录会被跳过；只要有数据被丢弃，原文件先备份为
    /// `hits.json.corrupt-<ts>`，之后的落盘不会抹掉原始内容。
    /// 文件存在但无法读取时返回错误。
    async fn load(&self) -> anyhow::Result<Vec<Hit>> {
        let content = match tokio::fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "Hit file {} not found, starting empty",
                    self.file_path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.file_path.display()));
            }
        };

        let (hits, lossy) = match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
            Ok(records) => {
                let (hits, skipped) = parse_records(records);
                (hits, skipped > 0)
            }
            Err(e) => {
                error!(
                    "Hit file {} is not a JSON array: {}",
                    self.file_path.display(),
                    e
                );
                (Vec::new(), true)
            }
        };

        if lossy {
            let backup = backup_corrupt_file(&self.file_path)
                .await
                .with_context(|| format!("Failed to back up {}", self.file_path.display()))?;
            warn!(
                "Original hit file copied to {} before discarding unreadable data",
                backup.display()
            );
        }
        Ok(hits)
    }

    async fn save(&self, hits: &[Hit]) -> anyhow::Result<()> {
        write_json_atomic(&self.file_path, hits)
            .await
            .with_context(|| format!("Failed to write {}", self.file_path.display()))
    }
}

/// 逐条解析，返回有效记录和跳过的条数
fn parse_records(records: Vec<serde_json::Value>) -> (Vec<Hit>, usize) {
    let mut skipped = 0;
    let hits = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Hit>(record) {
            Ok(hit) => Some(hit),
            Err(e) => {
                warn!("Skipping unreadable hit record #{}: {}", index, e);
                skipped += 1;
                None
            }
        })
        .collect();
    (hits, skipped)
}

/// 内存 Sink，保存最后一次写入的快照并统计写入次数
#[derive(Default)]
pub struct MemoryHitSink {
    saved: Mutex<Vec<Hit>>,
    saves: AtomicUsize,
}

impl MemoryHitSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置已“持久化”的点击
    pub fn with_hits(hits: Vec<Hit>) -> Self {
        Self {
            saved: Mutex::new(hits),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn saved(&self) -> Vec<Hit> {
        self.saved.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }
}

#[async_trait::async_trait]
impl HitSink for MemoryHitSink {
    async fn load(&self) -> anyhow::Result<Vec<Hit>> {
        Ok(self.saved.lock().clone())
    }

    async fn save(&self, hits: &[Hit]) -> anyhow::Result<()> {
        *self.saved.lock() = hits.to_vec();
        self.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
