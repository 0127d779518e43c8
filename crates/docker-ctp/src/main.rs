mod banner;
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use docker_ctp_build::BuildError;
use docker_ctp_config::LogLevel;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), error_message(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.banner {
        banner::print(cli.dry_run);
        return Ok(());
    }

    if cli.generate_config {
        logging::init(cli.log_level().unwrap_or(LogLevel::Normal));
        return commands::generate_config::handle(cli.dry_run);
    }

    commands::publish::handle(cli.overrides()).await
}

/// 1 行のユーザー向けメッセージ
fn error_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<BuildError>() {
        Some(build_error) => build_error.user_message(),
        None => format!("{:#}", e).replace('\n', " "),
    }
}
