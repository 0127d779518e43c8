use colored::Colorize;
use docker_ctp_config::generate::default_env_template_path;
use docker_ctp_config::{GenerateOutcome, TemplateKind, generate_config_files};

fn template_label(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Env => ".env",
        TemplateKind::DockerIgnore => ".dockerignore",
    }
}

/// `.env` をユーザー設定ディレクトリに、`.dockerignore` をカレントディレクトリに生成
pub fn handle(dry_run: bool) -> anyhow::Result<()> {
    let env_path = default_env_template_path()?;
    let dockerignore_path = std::env::current_dir()?.join(".dockerignore");

    println!("{}", "Generating configuration templates...".blue());
    let report = generate_config_files(&env_path, &dockerignore_path, dry_run)?;

    for file in &report.files {
        let label = template_label(file.kind);
        let path = file.path.display().to_string();
        match file.outcome {
            GenerateOutcome::Created => {
                println!("  {} Generated: {}", "✓".green(), path.cyan());
            }
            GenerateOutcome::AlreadyExists => {
                println!(
                    "  {} {} already exists - skipping template generation ({})",
                    "ℹ".blue(),
                    label,
                    path
                );
            }
            GenerateOutcome::WouldCreate => {
                println!(
                    "  {} DRY-RUN would write {} template to {}",
                    "→".yellow(),
                    label,
                    path
                );
            }
        }
    }

    if report.any_created() {
        println!();
        println!("{}", "Next steps:".bold());
        println!("  1. Edit {} and set your usernames", env_path.display());
        println!("  2. Set auth tokens (DOCKER_TOKEN / GITHUB_TOKEN) in the .env file");
        println!("  3. Review .dockerignore for your project");
        println!(
            "{}",
            "  Keep the .env file out of version control, it may contain tokens".yellow()
        );
    }

    Ok(())
}
