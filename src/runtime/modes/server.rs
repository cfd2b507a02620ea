use actix_web::{App, HttpServer, middleware::Compress};
use anyhow::Result;
use std::time::Duration;
use tracing::warn;

use crate::config::StaticConfig;
use crate::runtime::lifetime;

pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {:#}", e);
            e
        })?;

    let state = startup.state.clone();
    let hit_log = startup.hit_log.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Compress::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();
    let handle = server.handle();

    let result = tokio::select! {
        res = server => res,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            Ok(())
        }
    };

    // 服务器停止后再落盘，避免遗漏停机期间的点击
    lifetime::shutdown::flush_hit_log(
        &hit_log,
        Duration::from_secs(lifetime::shutdown::SHUTDOWN_TIMEOUT_SECS),
    )
    .await;
    warn!("Graceful shutdown: all tasks completed");

    result?;
    Ok(())
}
