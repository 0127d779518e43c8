//! docker-ctp の設定管理
//!
//! CLI 引数・環境変数・.env ファイルを 1 つの [`Config`] にまとめる。

pub mod env;
pub mod error;
pub mod generate;
pub mod model;
pub mod resolver;

pub use env::{EnvSnapshot, default_env_search_paths, env_search_paths};
pub use error::*;
pub use generate::{GenerateOutcome, GenerateReport, TemplateKind, generate_config_files};
pub use model::{Config, LogLevel, Registry};
pub use resolver::{CliOverrides, resolve};

use std::path::PathBuf;

/// ツール名（設定ディレクトリ名にも使う）
pub const APP_NAME: &str = "docker-ctp";

/// docker-ctp のユーザー設定ディレクトリ (`<config_dir>/docker-ctp`)
///
/// ディレクトリの作成は行わない。
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(APP_NAME))
}
