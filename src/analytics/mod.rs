//! 点击追踪与统计
//!
//! - `hit_log`: 内存点击日志，防抖 + 定时落盘，保留策略
//! - `sink`: 点击日志持久化后端
//! - `tracker`: 从 HTTP 请求构造点击记录
//! - `stats`: 过滤与聚合

pub mod hit_log;
pub mod sink;
pub mod stats;
pub mod tracker;

pub use hit_log::{HitLog, HitLogOptions};
pub use sink::{HitSink, JsonFileHitSink, MemoryHitSink};
pub use stats::{HitFilter, HitStats, aggregate};
pub use tracker::track;
