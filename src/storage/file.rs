use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::{Link, LinkStore, backup_corrupt_file, write_json_atomic};
use crate::errors::{LinktrackError, Result};

/// 基于 JSON 文件的链接存储
///
/// 文件内容是 `{"slug": "destination", ...}` 形式的对象。
/// 写锁覆盖“修改 + 落盘”全过程，两个并发写入不会互相覆盖。
pub struct FileLinkStore {
    file_path: PathBuf,
    links: RwLock<BTreeMap<String, String>>,
}

impl FileLinkStore {
    /// 打开链接文件；文件不存在时从空表开始
    ///
    /// 文件无法解析时先备份为 `links.json.corrupt-<ts>`，再从空表开始。
    pub async fn open(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let links = match Self::load_from_file(&file_path).await {
            Ok(links) => {
                info!("Loaded {} links from {}", links.len(), file_path.display());
                links
            }
            Err(e) => {
                error!("Failed to load links from {}: {}", file_path.display(), e);
                if matches!(e, LinktrackError::Serialization(_)) {
                    match backup_corrupt_file(&file_path).await {
                        Ok(backup) => warn!("Unreadable link file copied to {}", backup.display()),
                        Err(e) => error!("Failed to back up {}: {}", file_path.display(), e),
                    }
                }
                BTreeMap::new()
            }
        };

        Self {
            file_path,
            links: RwLock::new(links),
        }
    }

    async fn load_from_file(path: &Path) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                LinktrackError::serialization(format!("Failed to parse link file: {}", e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Link file {} not found, starting empty", path.display());
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, links: &BTreeMap<String, String>) {
        if let Err(e) = write_json_atomic(&self.file_path, links).await {
            error!(
                "Failed to save links to {}: {}",
                self.file_path.display(),
                e
            );
        }
    }
}

#[async_trait]
impl LinkStore for FileLinkStore {
    async fn get(&self, slug: &str) -> Option<String> {
        self.links.read().await.get(slug).cloned()
    }

    async fn set(&self, slug: &str, destination: &str) -> Result<Option<String>> {
        let mut links = self.links.write().await;
        let previous = links.insert(slug.to_string(), destination.to_string());
        self.persist(&links).await;
        Ok(previous)
    }

    async fn remove(&self, slug: &str) -> Result<()> {
        let mut links = self.links.write().await;
        if links.remove(slug).is_none() {
            return Err(LinktrackError::not_found(format!(
                "Link with slug {} not found",
                slug
            )));
        }
        self.persist(&links).await;
        info!("Removed link with slug: {}", slug);
        Ok(())
    }

    async fn list(&self) -> Vec<Link> {
        self.links
            .read()
            .await
            .iter()
            .map(|(slug, destination)| Link {
                slug: slug.clone(),
                destination: destination.clone(),
            })
            .collect()
    }

    async fn count(&self) -> usize {
        self.links.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let store = FileLinkStore::open(dir.path().join("links.json")).await;

        assert_eq!(store.set("abc", "https://example.com").await.unwrap(), None);
        assert_eq!(
            store.get("abc").await.as_deref(),
            Some("https://example.com")
        );

        assert_eq!(
            store.set("abc", "https://example.org").await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            store.get("abc").await.as_deref(),
            Some("https://example.org")
        );
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_slug() {
        let dir = TempDir::new().unwrap();
        let store = FileLinkStore::open(dir.path().join("links.json")).await;

        let err = store.remove("missing").await.unwrap_err();
        assert!(matches!(err, LinktrackError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");

        {
            let store = FileLinkStore::open(&path).await;
            store.set("a", "https://a.example").await.unwrap();
            store.set("b", "https://b.example").await.unwrap();
            store.remove("a").await.unwrap();
        }

        let raw = std::fs::read_to_string(&path).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["b"], "https://b.example");

        let reopened = FileLinkStore::open(&path).await;
        assert_eq!(reopened.get("a").await, None);
        assert_eq!(
            reopened.list().await,
            vec![Link {
                slug: "b".to_string(),
                destination: "https://b.example".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileLinkStore::open(&path).await;
        assert_eq!(store.count().await, 0);

        // 原内容保留在备份文件里
        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("links.json.corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(backups[0].path()).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        // 以目录作为目标文件，rename 必然失败
        let path = dir.path().join("links.json");
        std::fs::create_dir(&path).unwrap();

        let store = FileLinkStore::open(&path).await;
        store.set("abc", "https://example.com").await.unwrap();
        assert_eq!(
            store.get("abc").await.as_deref(),
            Some("https://example.com")
        );
    }
}
