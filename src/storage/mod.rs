use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::Result;

pub mod file;
pub mod models;

pub use file::FileLinkStore;
pub use models::{Hit, HitType, Link};

/// 链接存储抽象
///
/// 每次修改都会同步持久化完整的数据；持久化失败只记录日志，
/// 内存中的数据仍然是权威版本。
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn get(&self, slug: &str) -> Option<String>;

    /// 新建或覆盖，返回被覆盖的旧目标地址
    async fn set(&self, slug: &str, destination: &str) -> Result<Option<String>>;

    /// 不存在时返回 `NotFound`
    async fn remove(&self, slug: &str) -> Result<()>;

    /// 按 slug 排序
    async fn list(&self) -> Vec<Link>;

    async fn count(&self) -> usize;
}

/// 原子地写入 JSON 文件：先写临时文件，再 rename 覆盖
pub(crate) async fn write_json_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// 把无法解析的数据文件复制为 `<file>.corrupt-<unix millis>`，返回备份路径
///
/// 原文件保持不动，之后的写入会覆盖它。
pub(crate) async fn backup_corrupt_file(path: &Path) -> Result<PathBuf> {
    let mut backup = path.as_os_str().to_owned();
    backup.push(format!(".corrupt-{}", chrono::Utc::now().timestamp_millis()));
    let backup = PathBuf::from(backup);

    tokio::fs::copy(path, &backup).await?;
    Ok(backup)
}
