//! 設定レコードの型定義
//!
//! 1 回の実行につき 1 つだけ作られ、解決フェーズの後は読み取り専用として扱う。

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Docker Hub のデフォルトタグ
pub const DEFAULT_DOCKERHUB_TAG: &str = "latest";
/// GitHub Container Registry のデフォルトタグ
pub const DEFAULT_GITHUB_TAG: &str = "main";
/// Dockerfile ディレクトリのデフォルト
pub const DEFAULT_DOCKERFILE_DIR: &str = ".";

/// プッシュ先レジストリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Registry {
    #[default]
    Docker,
    Github,
}

impl Registry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Github => "github",
        }
    }

    /// タグ未指定時に使うタグ
    pub fn default_tag(&self) -> &'static str {
        match self {
            Self::Docker => DEFAULT_DOCKERHUB_TAG,
            Self::Github => DEFAULT_GITHUB_TAG,
        }
    }

    /// `docker login` に渡すサーバー名（Docker Hub は省略）
    pub fn login_server(&self) -> Option<&'static str> {
        match self {
            Self::Docker => None,
            Self::Github => Some("ghcr.io"),
        }
    }

    /// トークンを探す環境変数（優先順）
    pub fn token_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Docker => &["DOCKER_TOKEN", "DOCKER_PASSWORD"],
            Self::Github => &["GITHUB_TOKEN", "GHCR_TOKEN"],
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Registry {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docker" => Ok(Self::Docker),
            "github" => Ok(Self::Github),
            other => Err(ConfigError::InvalidRegistry(other.to_string())),
        }
    }
}

/// ログの詳細度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        }
    }

    /// tracing のフィルタ文字列
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

/// 実行全体で持ち回す設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub registry: Registry,
    pub docker_username: String,
    pub github_username: String,
    /// 実際にログインで使うユーザー名（空なら registry から導出）
    pub username: String,
    pub image_name: String,
    /// 空の場合は registry ごとのデフォルトで埋める
    pub tag: String,
    pub dockerfile_dir: PathBuf,
    pub use_cache: bool,
    pub force_rebuild: bool,
    pub dry_run: bool,
    pub log_level: LogLevel,
    pub cleanup_on_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: Registry::default(),
            docker_username: String::new(),
            github_username: String::new(),
            username: String::new(),
            image_name: String::new(),
            tag: String::new(),
            dockerfile_dir: PathBuf::from(DEFAULT_DOCKERFILE_DIR),
            use_cache: true,
            force_rebuild: false,
            dry_run: false,
            log_level: LogLevel::default(),
            cleanup_on_exit: true,
        }
    }
}

impl Config {
    /// username が空なら registry に応じたユーザー名で埋める
    pub fn resolve_username(&mut self) {
        if self.username.is_empty() {
            self.username = match self.registry {
                Registry::Docker => self.docker_username.clone(),
                Registry::Github => self.github_username.clone(),
            };
        }
    }

    /// tag が空なら registry のデフォルトタグで埋める
    pub fn set_default_tag(&mut self) {
        if self.tag.is_empty() {
            self.tag = self.registry.default_tag().to_string();
        }
    }

    /// registry 側のユーザー名が空なら明示された username で埋める
    ///
    /// `-u` だけ指定した場合に `/<image>:<tag>` のような宛先にならないようにする。
    pub fn fill_registry_username(&mut self) {
        let slot = match self.registry {
            Registry::Docker => &mut self.docker_username,
            Registry::Github => &mut self.github_username,
        };
        if slot.is_empty() {
            *slot = self.username.clone();
        }
    }

    /// 派生値の解決。マージ完了後に一度だけ呼ぶ
    pub fn apply_defaults(&mut self) {
        self.resolve_username();
        self.fill_registry_username();
        self.set_default_tag();
    }

    /// ローカルのビルドタグ (`<image_name>:<tag>`)
    pub fn local_tag(&self) -> String {
        format!("{}:{}", self.image_name, self.tag)
    }

    /// レジストリ付きのイメージ名
    ///
    /// - docker: `<docker_username>/<image_name>:<tag>`
    /// - github: `ghcr.io/<github_username>/<image_name>:<tag>`
    pub fn registry_image(&self) -> String {
        match self.registry {
            Registry::Docker => {
                format!("{}/{}:{}", self.docker_username, self.image_name, self.tag)
            }
            Registry::Github => format!(
                "ghcr.io/{}/{}:{}",
                self.github_username, self.image_name, self.tag
            ),
        }
    }

    pub fn dockerfile_path(&self) -> PathBuf {
        self.dockerfile_dir.join("Dockerfile")
    }
}
