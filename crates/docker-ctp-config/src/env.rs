//! 環境変数と .env ファイル
//!
//! プロセス環境は起動時に一度だけ [`EnvSnapshot`] に写し取り、以降はこのスナップショット
//! を明示的に引き回す。プロセス環境そのものは書き換えない。

use crate::APP_NAME;
use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 環境変数のスナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// 現在のプロセス環境から作成
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// UTF-8 でないキーや値を持つ変数は読み飛ばす
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let vars = pairs
            .into_iter()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    debug!(
                        "Skipping environment variable with non UTF-8 contents: {}",
                        key.unwrap_or_else(|k| k.to_string_lossy().into_owned())
                    );
                    None
                }
            })
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// 値が空文字列の場合は未設定扱い
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// 未設定のキーだけを追加する（既存の値は上書きしない）
    ///
    /// 戻り値は実際に追加された件数
    pub fn merge_missing<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut added = 0;
        for (key, value) in entries {
            if !self.vars.contains_key(&key) {
                self.vars.insert(key, value);
                added += 1;
            }
        }
        added
    }

    /// 検索パスから最初に見つかった .env を読み込んでマージする
    pub fn load_first_env_file(&mut self, candidates: &[PathBuf]) -> Result<Option<PathBuf>> {
        let Some(path) = find_env_file(candidates) else {
            debug!("No .env file found in search paths");
            return Ok(None);
        };

        let entries = parse_env_file(&path)?;
        let added = self.merge_missing(entries);
        debug!(file = %path.display(), variable_count = added, "Loaded variables from .env file");
        Ok(Some(path))
    }
}

/// .env の検索パス
///
/// 以下の順で検索し、最初に存在したファイルだけを使う:
/// 1. `./.env`（カレントディレクトリ名が `docker-ctp` の場合のみ）
/// 2. `<config_dir>/docker-ctp/.env`
/// 3. `~/.docker-ctp/.env`
/// 4. `/etc/docker-ctp/.env`
pub fn env_search_paths(
    cwd: &Path,
    config_dir: Option<&Path>,
    home_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    // 無関係なプロジェクトの .env を拾わないようにディレクトリ名で限定
    if cwd.file_name().and_then(|n| n.to_str()) == Some(APP_NAME) {
        paths.push(cwd.join(".env"));
    }
    if let Some(config_dir) = config_dir {
        paths.push(config_dir.join(APP_NAME).join(".env"));
    }
    if let Some(home) = home_dir {
        paths.push(home.join(format!(".{}", APP_NAME)).join(".env"));
    }
    paths.push(PathBuf::from(format!("/etc/{}/.env", APP_NAME)));

    paths
}

/// ユーザー環境の標準ディレクトリを使った検索パス
pub fn default_env_search_paths(cwd: &Path) -> Vec<PathBuf> {
    let config_dir = dirs::config_dir();
    let home_dir = dirs::home_dir();
    env_search_paths(cwd, config_dir.as_deref(), home_dir.as_deref())
}

pub fn find_env_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

pub fn parse_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(parse_env_str(&content))
}

/// `KEY=VALUE` 形式をパース
///
/// キーは大文字に正規化する。
pub fn parse_env_str(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();

        // 空行とコメント行をスキップ
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = strip_quotes(value.trim());
            entries.push((key.to_ascii_uppercase(), value.to_string()));
        }
    }
    entries
}

/// "value" や 'value' のクォートを除去
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
