//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linktrack - link shortener with hit analytics
#[derive(Parser, Debug)]
#[command(name = "linktrack")]
#[command(version)]
#[command(about = "A link shortener with redirect and pixel hit tracking", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print a sample config.toml to stdout
    GenerateConfig,
}

impl Cli {
    /// 未指定子命令时默认启动服务器
    pub fn mode(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_serve() {
        let cli = Cli::try_parse_from(["linktrack"]).unwrap();
        assert_eq!(cli.mode(), Commands::Serve);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_config_flag_and_subcommand() {
        let cli =
            Cli::try_parse_from(["linktrack", "generate-config", "-c", "custom.toml"]).unwrap();
        assert_eq!(cli.mode(), Commands::GenerateConfig);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["linktrack", "tui"]).is_err());
    }
}
