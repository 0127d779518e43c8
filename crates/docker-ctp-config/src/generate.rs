//! `--generate-config` 用のテンプレート生成
//!
//! 既存ファイルは絶対に上書きしない。

use crate::error::{ConfigError, Result};
use crate::{APP_NAME, get_config_dir};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_TEMPLATE: &str = r#"# docker-ctp configuration
# Generated by `docker-ctp --generate-config`

# Docker Hub account used for `docker login` and image naming
DOCKER_USERNAME="your-dockerhub-username"

# GitHub user or organization that owns the ghcr.io packages
GITHUB_USERNAME="your-github-username"

# Directory containing the Dockerfile
DOCKERFILE_DIR="."

# Target registry: "docker" or "github"
REGISTRY="docker"

# Access tokens (prefer tokens over passwords)
# DOCKER_TOKEN="your-docker-hub-access-token"
# DOCKER_PASSWORD="your-docker-hub-password"
# GITHUB_TOKEN="your-github-personal-access-token"
# GHCR_TOKEN="your-github-personal-access-token"

# Build and runtime behaviour
# USE_CACHE=true
# FORCE_REBUILD=false
# LOG_LEVEL="normal"  # quiet, normal or verbose
# CLEANUP_ON_EXIT=true
"#;

pub const DOCKERIGNORE_TEMPLATE: &str = r#"# Generated by `docker-ctp --generate-config`

# Version control
.git
.gitignore
.gitattributes

# Editors
.vscode
.idea
*.swp
*.swo
*~

# OS metadata
.DS_Store
Thumbs.db

# Logs and temporary files
*.log
logs/
*.tmp
*.temp

# Dependencies
node_modules/
target/

# Documentation
README*
*.md
docs/

# Tests
test/
tests/
coverage/

# Local environment files
.env
.env.*
"#;

/// 生成対象ファイルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Env,
    DockerIgnore,
}

impl TemplateKind {
    pub fn contents(&self) -> &'static str {
        match self {
            Self::Env => ENV_TEMPLATE,
            Self::DockerIgnore => DOCKERIGNORE_TEMPLATE,
        }
    }
}

/// 1 ファイル分の生成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Created,
    AlreadyExists,
    /// dry-run のため書き込まなかった
    WouldCreate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub kind: TemplateKind,
    pub path: PathBuf,
    pub outcome: GenerateOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub files: Vec<GeneratedFile>,
}

impl GenerateReport {
    pub fn created(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files
            .iter()
            .filter(|f| f.outcome == GenerateOutcome::Created)
    }

    pub fn any_created(&self) -> bool {
        self.created().next().is_some()
    }
}

/// ユーザー設定 .env テンプレートの出力先
pub fn default_env_template_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(".env"))
}

/// テンプレートファイルを生成
pub fn generate_config_files(
    env_path: &Path,
    dockerignore_path: &Path,
    dry_run: bool,
) -> Result<GenerateReport> {
    let mut report = GenerateReport::default();
    report
        .files
        .push(write_template(TemplateKind::Env, env_path, dry_run)?);
    report.files.push(write_template(
        TemplateKind::DockerIgnore,
        dockerignore_path,
        dry_run,
    )?);
    Ok(report)
}

fn write_template(kind: TemplateKind, path: &Path, dry_run: bool) -> Result<GeneratedFile> {
    let outcome = if path.exists() {
        debug!(file = %path.display(), "Template target already exists, skipping");
        GenerateOutcome::AlreadyExists
    } else if dry_run {
        GenerateOutcome::WouldCreate
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, kind.contents()).map_err(|e| ConfigError::EnvFile {
            path: path.to_path_buf(),
            message: format!("failed to write {} template: {}", APP_NAME, e),
        })?;
        debug!(file = %path.display(), "Template written");
        GenerateOutcome::Created
    };

    Ok(GeneratedFile {
        kind,
        path: path.to_path_buf(),
        outcome,
    })
}
