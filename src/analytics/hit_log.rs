//! 点击日志
//!
//! 负责在内存中保存全部点击记录并异步落盘：
//! - 追加是同步的，顺序即到达顺序
//! - 每次追加都会重置防抖计时器，突发流量只产生一次写入
//! - 可选的定时刷盘，避免持续流量下防抖一直被推迟
//! - 可配置的保留策略（最大条数 / 保留天数）

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use super::HitSink;
use crate::config::TrackingConfig;
use crate::storage::{Hit, HitType};

/// 未配置定时刷盘时，保留策略的检查间隔
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct HitLogOptions {
    /// 最后一次追加后的静默时间
    pub debounce: Duration,
    /// 定时刷盘间隔，None 表示只依赖防抖
    pub flush_interval: Option<Duration>,
    /// 最大条数，0 表示不限制
    pub max_hits: usize,
    /// 保留时长，None 表示永久保留
    pub retention: Option<chrono::Duration>,
}

impl Default for HitLogOptions {
    fn default() -> Self {
        Self::from(&TrackingConfig::default())
    }
}

impl From<&TrackingConfig> for HitLogOptions {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            debounce: config.flush_debounce(),
            flush_interval: config.flush_interval(),
            max_hits: config.max_hits,
            retention: (config.retention_days > 0)
                .then(|| chrono::Duration::days(config.retention_days as i64)),
        }
    }
}

struct HitLogInner {
    hits: RwLock<Vec<Hit>>,
    sink: Arc<dyn HitSink>,
    options: HitLogOptions,
    /// 内存中有未落盘的修改
    dirty: AtomicBool,
    /// 串行化落盘
    flush_lock: tokio::sync::Mutex<()>,
    /// 等待中的防抖任务
    pending_flush: Mutex<Option<JoinHandle<()>>>,
    /// 定时维护任务
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// 点击日志（克隆开销很小，所有克隆共享同一份数据）
#[derive(Clone)]
pub struct HitLog {
    inner: Arc<HitLogInner>,
}

impl HitLog {
    pub fn new(sink: Arc<dyn HitSink>, options: HitLogOptions) -> Self {
        Self::from_hits(sink, options, Vec::new())
    }

    fn from_hits(sink: Arc<dyn HitSink>, options: HitLogOptions, hits: Vec<Hit>) -> Self {
        Self {
            inner: Arc::new(HitLogInner {
                hits: RwLock::new(hits),
                sink,
                options,
                dirty: AtomicBool::new(false),
                flush_lock: tokio::sync::Mutex::new(()),
                pending_flush: Mutex::new(None),
                ticker: Mutex::new(None),
            }),
        }
    }

    /// 从 Sink 加载已有点击
    ///
    /// 加载失败时返回错误，不会带着空日志覆盖无法读取的数据。
    pub async fn load(sink: Arc<dyn HitSink>, options: HitLogOptions) -> anyhow::Result<Self> {
        let hits = sink.load().await?;
        info!("Loaded {} hits from disk", hits.len());
        Ok(Self::from_hits(sink, options, hits))
    }

    /// 追加一条点击并安排防抖刷盘
    pub fn append(&self, hit: Hit) {
        {
            let mut hits = self.inner.hits.write();
            hits.push(hit);

            let max = self.inner.options.max_hits;
            if max > 0 && hits.len() > max {
                let excess = hits.len() - max;
                hits.drain(..excess);
                trace!("HitLog: dropped {} oldest hits over cap {}", excess, max);
            }
        }
        self.inner.dirty.store(true, Ordering::Release);
        self.schedule_flush();
    }

    /// 重置防抖计时器
    fn schedule_flush(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            trace!("HitLog: no runtime, flush deferred to next explicit flush");
            return;
        };

        let log = self.clone();
        let delay = self.inner.options.debounce;

        let mut pending = self.inner.pending_flush.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        // 计时结束后另起任务落盘，abort 只会打断等待阶段，不会打断写入
        *pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(async move {
                let _ = log.flush().await;
            });
        }));
    }

    /// 启动定时维护任务：按间隔落盘并执行保留策略
    ///
    /// 既没有定时刷盘也没有保留策略时不启动任何任务。
    pub fn start_background_task(&self) {
        let options = &self.inner.options;
        if options.flush_interval.is_none() && options.retention.is_none() {
            debug!("HitLog: periodic maintenance disabled");
            return;
        }

        let period = options.flush_interval.unwrap_or(MAINTENANCE_INTERVAL);
        let log = self.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // 第一次 tick 立即返回
            interval.tick().await;
            loop {
                interval.tick().await;
                log.prune_expired();
                if log.inner.options.flush_interval.is_some() {
                    let _ = log.flush().await;
                }
            }
        });

        if let Some(previous) = self.inner.ticker.lock().replace(task) {
            previous.abort();
        }
    }

    /// 删除超过保留时长的点击，返回删除条数
    pub fn prune_expired(&self) -> usize {
        let Some(retention) = self.inner.options.retention else {
            return 0;
        };
        let cutoff = Utc::now() - retention;

        let removed = {
            let mut hits = self.inner.hits.write();
            let before = hits.len();
            hits.retain(|hit| hit.timestamp >= cutoff);
            before - hits.len()
        };

        if removed > 0 {
            self.inner.dirty.store(true, Ordering::Release);
            info!("HitLog: pruned {} hits older than {}", removed, cutoff);
        }
        removed
    }

    /// 立即落盘（没有未保存的修改时直接返回）
    ///
    /// 返回写入的条数。写入失败时日志保持 dirty，等待下一次触发。
    pub async fn flush(&self) -> anyhow::Result<usize> {
        let _guard = self.inner.flush_lock.lock().await;

        if !self.inner.dirty.swap(false, Ordering::AcqRel) {
            trace!("HitLog: nothing to flush");
            return Ok(0);
        }

        let snapshot = self.inner.hits.read().clone();
        match self.inner.sink.save(&snapshot).await {
            Ok(()) => {
                debug!("HitLog: flushed {} hits", snapshot.len());
                Ok(snapshot.len())
            }
            Err(e) => {
                self.inner.dirty.store(true, Ordering::Release);
                error!("Error saving hits: {:#}", e);
                Err(e)
            }
        }
    }

    /// 停止后台任务并做最后一次落盘
    pub async fn shutdown(&self) -> anyhow::Result<usize> {
        if let Some(pending) = self.inner.pending_flush.lock().take() {
            pending.abort();
        }
        if let Some(ticker) = self.inner.ticker.lock().take() {
            ticker.abort();
        }
        self.flush().await
    }

    pub fn len(&self) -> usize {
        self.inner.hits.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.hits.read().is_empty()
    }

    /// 是否存在未落盘的修改
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.load(Ordering::Acquire)
    }

    /// 在读锁内访问全部点击（按到达顺序）
    pub fn with_hits<R>(&self, f: impl FnOnce(&[Hit]) -> R) -> R {
        let hits = self.inner.hits.read();
        f(&hits)
    }

    /// 统计某个 slug 某种类型的点击数（线性扫描）
    pub fn count_for(&self, slug: &str, kind: HitType) -> usize {
        self.with_hits(|hits| {
            hits.iter()
                .filter(|hit| hit.kind == kind && hit.slug == slug)
                .count()
        })
    }
}
