//! # Attitude CLI
//!
//! `attitude` 命令行入口：加载 `.env`，初始化日志，分发子命令。
//!
//! 退出码：成功 0，任何失败 1（错误链只以一条 `error` 日志报告一次）。

mod cli;
mod commands;
mod error;
mod pipeline;

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_info, run_pipeline, run_validate};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = observability::init_tracing_with_filter(cli.log_format.into(), log_filter(&cli))
    {
        eprintln!("attitude: {e:#}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "attitude starting");

    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "Command failed");
            ExitCode::FAILURE
        }
    }
}

/// `-q` 固定为 warn；否则 `RUST_LOG` 优先，其次是 `-v` 计数
fn log_filter(cli: &Cli) -> EnvFilter {
    if cli.quiet {
        return EnvFilter::new("warn");
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(cli.verbose)))
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
