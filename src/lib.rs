//! linktrack - a link shortener with hit analytics
//!
//! Short links redirect to their destination and record a hit; tracking
//! pixels record a hit and return a transparent PNG. Hits are aggregated
//! and exported through an authenticated admin API.
//!
//! # Architecture
//! - `storage`: link store and persisted models
//! - `analytics`: hit log, ingest and aggregation
//! - `services`: link and analytics business logic
//! - `api`: HTTP services and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and server mode
//! - `system`: Logging

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
