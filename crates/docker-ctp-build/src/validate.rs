//! 入力値の検証
//!
//! Docker コマンドを 1 つでも実行する前に、設定値をすべてここで検証する。

use crate::context::check_build_context;
use crate::error::{BuildError, BuildResult};
use docker_ctp_config::Config;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// username / image name / tag 共通の識別子パターン
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]{1,100}$").expect("valid identifier regex"));

pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

pub fn validate_username(username: &str) -> BuildResult<()> {
    if username.is_empty() {
        return Err(BuildError::Config("Username is required".to_string()));
    }
    if !is_valid_identifier(username) {
        return Err(BuildError::Validation(format!(
            "Invalid username: {}",
            username
        )));
    }
    Ok(())
}

pub fn validate_image_name(name: &str) -> BuildResult<()> {
    if name.is_empty() {
        return Err(BuildError::Config("Image name is required".to_string()));
    }
    if !is_valid_identifier(name) {
        return Err(BuildError::Validation(format!("Invalid image name: {}", name)));
    }
    Ok(())
}

pub fn validate_tag(tag: &str) -> BuildResult<()> {
    if !is_valid_identifier(tag) {
        return Err(BuildError::Validation(format!("Invalid tag: {}", tag)));
    }
    Ok(())
}

/// ディレクトリが存在し、`Dockerfile` を含むことを確認
pub fn validate_dockerfile_dir(dir: &Path) -> BuildResult<()> {
    tracing::debug!("Checking for Dockerfile at {}", dir.join("Dockerfile").display());
    if !dir.is_dir() {
        return Err(BuildError::Validation(format!(
            "Dockerfile directory not found: {}",
            dir.display()
        )));
    }
    let dockerfile = dir.join("Dockerfile");
    if !dockerfile.is_file() {
        return Err(BuildError::Config(format!(
            "Dockerfile not found at {}",
            dockerfile.display()
        )));
    }
    Ok(())
}

/// 設定全体を検証
///
/// ビルドコンテキストの衛生チェックは警告のみで、失敗にはならない。
pub fn validate_config(config: &Config) -> BuildResult<()> {
    tracing::info!("Validating configuration...");

    // registry は型で保証されている（不正値は解決時に ConfigError）
    validate_username(&config.username)?;
    validate_image_name(&config.image_name)?;
    validate_tag(&config.tag)?;

    validate_dockerfile_dir(&config.dockerfile_dir)?;
    check_build_context(&config.dockerfile_dir);

    tracing::info!("Configuration validation completed");
    Ok(())
}
