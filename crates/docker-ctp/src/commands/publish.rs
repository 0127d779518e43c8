use crate::{banner, logging};
use colored::Colorize;
use docker_ctp_build::{
    Docker, Pipeline, PipelineReport, Runner, TerminalPrompt, check_dependencies, validate_config,
};
use docker_ctp_config::{CliOverrides, Config, EnvSnapshot, default_env_search_paths, resolve};

/// 設定を解決して login → build → tag → push を実行
pub async fn handle(overrides: CliOverrides) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let mut env = EnvSnapshot::from_process();
    let env_file = env.load_first_env_file(&default_env_search_paths(&cwd))?;

    let config = resolve(&overrides, &env, &cwd)?;
    logging::init(config.log_level);

    match &env_file {
        Some(path) => tracing::debug!("Loaded environment from {}", path.display()),
        None => tracing::debug!("No .env file found"),
    }

    let quiet = config.log_level.is_quiet();
    if !quiet {
        banner::print(config.dry_run);
    }

    validate_config(&config)?;

    let runner = Runner::system(config.dry_run).with_progress(!quiet);
    let docker = Docker::new(runner);
    check_dependencies(&docker).await?;

    let report = Pipeline::new(&config, docker, &env, &TerminalPrompt)
        .run()
        .await?;

    if !quiet {
        print_summary(&config, &report);
    }
    println!("{}", "Completed".green().bold());
    Ok(())
}

fn print_summary(config: &Config, report: &PipelineReport) {
    println!();
    println!("{}", "Summary:".bold());
    println!("  Registry: {}", config.registry.to_string().cyan());
    if report.build_skipped {
        println!("  Image:    {} (existing image reused)", report.local_tag.cyan());
    } else {
        println!("  Image:    {}", report.local_tag.cyan());
    }
    println!("  Pushed:   {}", report.remote_image.cyan());
    if let Some(cleanup) = &report.cleanup {
        if !cleanup.failed.is_empty() {
            println!(
                "  {} Could not remove: {}",
                "⚠".yellow(),
                cleanup.failed.join(", ")
            );
        }
    }
    if config.dry_run {
        println!("  {}", "(dry run, nothing was executed)".yellow());
    }
}
