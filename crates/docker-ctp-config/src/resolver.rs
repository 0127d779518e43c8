//! 設定の解決
//!
//! 優先順位: CLI > 環境変数 / .env > 組み込みデフォルト
//!
//! CLI で明示された値は `Some` で渡され、環境側の値で上書きされることはない。
//! username と tag のデフォルト補完はすべてのマージが終わった後に一度だけ行う。

use crate::env::EnvSnapshot;
use crate::error::Result;
use crate::model::{Config, LogLevel, Registry};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// CLI から渡される値（未指定は `None` / `false`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub registry: Option<Registry>,
    pub username: Option<String>,
    pub image_name: Option<String>,
    pub tag: Option<String>,
    pub dockerfile_dir: Option<PathBuf>,
    pub no_cache: bool,
    pub force_rebuild: bool,
    pub dry_run: bool,
    pub log_level: Option<LogLevel>,
    pub no_cleanup: bool,
}

/// 組み込みデフォルト
///
/// ユーザー名はどちらのレジストリでも `$USER` を使う。
pub fn builtin_defaults(env: &EnvSnapshot) -> Config {
    let user = env.get("USER").unwrap_or_default().to_string();
    Config {
        docker_username: user.clone(),
        github_username: user,
        ..Default::default()
    }
}

/// CLI・環境変数・組み込みデフォルトから設定を解決
///
/// `env` には .env ファイルの内容をマージ済みのスナップショットを渡す。
pub fn resolve(cli: &CliOverrides, env: &EnvSnapshot, cwd: &Path) -> Result<Config> {
    let mut config = builtin_defaults(env);

    // registry
    config.registry = match cli.registry {
        Some(registry) => registry,
        None => match env.get_non_empty("REGISTRY") {
            Some(value) => value.parse()?,
            None => config.registry,
        },
    };

    // 認証ユーザー
    if let Some(value) = env.get_non_empty("DOCKER_USERNAME") {
        config.docker_username = value.to_string();
    }
    if let Some(value) = env.get_non_empty("GITHUB_USERNAME") {
        config.github_username = value.to_string();
    }
    if let Some(username) = &cli.username {
        config.username = username.clone();
    }

    // イメージ情報
    config.image_name = pick_string(cli.image_name.as_deref(), env, "IMAGE_NAME");
    config.tag = pick_string(cli.tag.as_deref(), env, "TAG");
    config.dockerfile_dir = match &cli.dockerfile_dir {
        Some(dir) => dir.clone(),
        None => env
            .get_non_empty("DOCKERFILE_DIR")
            .map(PathBuf::from)
            .unwrap_or(config.dockerfile_dir),
    };

    // ビルドフラグ
    config.use_cache = if cli.no_cache {
        false
    } else {
        env_bool(env, "USE_CACHE").unwrap_or(config.use_cache)
    };
    config.force_rebuild =
        cli.force_rebuild || env_bool(env, "FORCE_REBUILD").unwrap_or(config.force_rebuild);

    // 実行時フラグ
    config.dry_run = cli.dry_run || env_bool(env, "DRY_RUN").unwrap_or(config.dry_run);
    config.log_level = match cli.log_level {
        Some(level) => level,
        None => match env.get_non_empty("LOG_LEVEL") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("Ignoring LOG_LEVEL: {}", e);
                config.log_level
            }),
            None => config.log_level,
        },
    };
    config.cleanup_on_exit = if cli.no_cleanup || env.get_non_empty("NO_CLEANUP").is_some() {
        false
    } else {
        env_bool(env, "CLEANUP_ON_EXIT").unwrap_or(config.cleanup_on_exit)
    };

    if config.image_name.is_empty() {
        config.image_name = default_image_name(&config.dockerfile_dir, cwd);
    }

    config.apply_defaults();

    debug!(
        registry = %config.registry,
        username = %config.username,
        image = %config.local_tag(),
        dockerfile_dir = %config.dockerfile_dir.display(),
        dry_run = config.dry_run,
        "Resolved configuration"
    );

    Ok(config)
}

fn pick_string(cli: Option<&str>, env: &EnvSnapshot, key: &str) -> String {
    cli.or_else(|| env.get_non_empty(key))
        .unwrap_or_default()
        .to_string()
}

/// "true"（大文字小文字無視）のみ true
fn env_bool(env: &EnvSnapshot, key: &str) -> Option<bool> {
    env.get_non_empty(key)
        .map(|value| value.eq_ignore_ascii_case("true"))
}

/// イメージ名のデフォルト: Dockerfile ディレクトリ名、取れなければカレントディレクトリ名
pub fn default_image_name(dockerfile_dir: &Path, cwd: &Path) -> String {
    let dir = if dockerfile_dir.is_absolute() {
        dockerfile_dir.to_path_buf()
    } else {
        cwd.join(dockerfile_dir)
    };

    dir.canonicalize()
        .ok()
        .as_deref()
        .and_then(dir_name)
        .or_else(|| dir_name(cwd))
        .unwrap_or_default()
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}
