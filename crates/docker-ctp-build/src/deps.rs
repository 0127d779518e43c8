//! 実行前の依存チェック

use crate::docker::{DOCKER_PROGRAM, Docker};
use crate::error::{BuildError, BuildResult};
use std::path::PathBuf;

/// `docker` 実行ファイルとデーモンを確認
///
/// dry-run では何も起動しないため、実行ファイルが無くても警告にとどめ、
/// デーモンの確認も行わない。
pub async fn check_dependencies(docker: &Docker) -> BuildResult<Option<PathBuf>> {
    tracing::debug!("Checking dependencies...");
    let dry_run = docker.runner().is_dry_run();

    let executable = match which::which(DOCKER_PROGRAM) {
        Ok(path) => {
            tracing::debug!("Found {} at {}", DOCKER_PROGRAM, path.display());
            Some(path)
        }
        Err(_) if dry_run => {
            tracing::warn!("{} executable not found in PATH", DOCKER_PROGRAM);
            None
        }
        Err(_) => {
            return Err(BuildError::Dependency(format!(
                "{} executable not found in PATH",
                DOCKER_PROGRAM
            )));
        }
    };

    if dry_run {
        tracing::debug!("Skipping Docker daemon check in dry-run mode");
    } else if !docker.daemon_available().await? {
        return Err(BuildError::Dependency(
            "Docker daemon is not reachable".to_string(),
        ));
    }

    Ok(executable)
}
