use clap::Parser;

use linktrack::cli::{Cli, Commands};
use linktrack::config::{StaticConfig, init_config};
use linktrack::errors::LinktrackError;
use linktrack::runtime::modes::run_server;
use linktrack::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.mode() == Commands::GenerateConfig {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    let config = match init_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return Err(e.into());
        }
    };

    // guard 需要存活到进程结束
    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            let err = LinktrackError::file_operation(format!(
                "Failed to initialize logging: {:#}",
                e
            ));
            eprintln!("{}", err.format_colored());
            return Err(err.into());
        }
    };

    if let Err(e) = run_server(&config).await {
        tracing::error!("Server error: {:#}", e);
        return Err(e);
    }
    Ok(())
}
