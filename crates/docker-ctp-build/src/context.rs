//! ビルドコンテキストの衛生チェック
//!
//! ここで見つかった問題はすべて警告扱いで、ビルドは中断しない。

use glob::Pattern;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// .dockerignore で除外すべき代表的なファイル・ディレクトリ
pub const COMMON_EXCLUDES: &[&str] = &[
    ".git",
    "node_modules",
    "*.log",
    "*.tmp",
    ".DS_Store",
    "Thumbs.db",
    "*.swp",
    "*.swo",
    ".vscode",
    ".idea",
    "coverage",
    "test",
    "tests",
    "*.md",
    "README*",
];

/// これを超えるファイルは警告する (50MiB)
pub const LARGE_FILE_THRESHOLD: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextWarning {
    MissingDockerIgnore,
    UnreadableDockerIgnore(String),
    /// `**` の行（1 始まりの行番号）
    ExcludesEverything(usize),
    /// .dockerignore に書かれていない除外候補
    NotIgnored(Vec<String>),
    LargeFiles(Vec<LargeFile>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeFile {
    pub path: PathBuf,
    pub size: u64,
}

impl fmt::Display for LargeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.1}MB)",
            self.path.display(),
            self.size as f64 / (1024.0 * 1024.0)
        )
    }
}

impl ContextWarning {
    /// 対応する改善案
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingDockerIgnore => Some(
                "Create a .dockerignore file to exclude unnecessary files and optimize build context."
                    .to_string(),
            ),
            Self::NotIgnored(patterns) => Some(format!(
                "Add these patterns to .dockerignore: {}",
                patterns.join(", ")
            )),
            Self::LargeFiles(_) => Some(
                "Consider excluding large files or using multi-stage builds to reduce image size."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextReport {
    pub warnings: Vec<ContextWarning>,
}

impl ContextReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.warnings.iter().filter_map(|w| w.suggestion()).collect()
    }
}

/// ビルドコンテキストを検査してレポートを返す（ログは出さない）
pub fn inspect_build_context(dir: &Path) -> ContextReport {
    let mut report = ContextReport::default();

    let ignore_patterns = match fs::read_to_string(dir.join(".dockerignore")) {
        Ok(content) => {
            let lines: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
            for (i, line) in lines.iter().enumerate() {
                if line == "**" {
                    report.warnings.push(ContextWarning::ExcludesEverything(i + 1));
                }
            }
            lines
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            report.warnings.push(ContextWarning::MissingDockerIgnore);
            Vec::new()
        }
        Err(e) => {
            report
                .warnings
                .push(ContextWarning::UnreadableDockerIgnore(e.to_string()));
            Vec::new()
        }
    };

    let candidates = find_excludables(dir, &ignore_patterns);
    if !candidates.is_empty() {
        report.warnings.push(ContextWarning::NotIgnored(candidates));
    }

    let large = find_large_files(dir, LARGE_FILE_THRESHOLD);
    if !large.is_empty() {
        report.warnings.push(ContextWarning::LargeFiles(large));
    }

    report
}

/// 検査してから結果を警告ログとして出す
pub fn check_build_context(dir: &Path) -> ContextReport {
    tracing::info!("Validating build context in {}...", dir.display());
    let report = inspect_build_context(dir);

    for warning in &report.warnings {
        match warning {
            ContextWarning::MissingDockerIgnore => {
                tracing::warn!("No .dockerignore file found in build context")
            }
            ContextWarning::UnreadableDockerIgnore(e) => {
                tracing::warn!("Could not read .dockerignore file: {}", e)
            }
            ContextWarning::ExcludesEverything(line) => {
                tracing::warn!(".dockerignore line {} ('**') may exclude everything", line)
            }
            ContextWarning::NotIgnored(patterns) => {
                tracing::warn!("Found files/directories that could be excluded:");
                for pattern in patterns {
                    tracing::warn!("  - {}", pattern);
                }
            }
            ContextWarning::LargeFiles(files) => {
                tracing::warn!("Found large files in build context:");
                for file in files {
                    tracing::warn!("  - {}", file);
                }
            }
        }
    }

    if report.is_clean() {
        tracing::info!("Build context validation passed with no issues");
    } else {
        tracing::warn!(
            "Build context validation completed with {} warnings",
            report.warnings.len()
        );
        tracing::info!("Optimization suggestions:");
        for suggestion in report.suggestions() {
            tracing::info!("  - {}", suggestion);
        }
    }

    report
}

/// 存在するのに .dockerignore に無い除外候補
fn find_excludables(dir: &Path, ignore_patterns: &[String]) -> Vec<String> {
    COMMON_EXCLUDES
        .iter()
        .filter(|pattern| !is_listed(pattern, ignore_patterns))
        .filter(|pattern| {
            if pattern.contains('*') {
                matches_any_entry(dir, pattern)
            } else {
                dir.join(pattern).is_dir()
            }
        })
        .map(|pattern| pattern.to_string())
        .collect()
}

/// `node_modules/` や `/node_modules` のような書き方も同じものとして扱う
fn is_listed(pattern: &str, ignore_patterns: &[String]) -> bool {
    ignore_patterns
        .iter()
        .map(|line| line.trim_start_matches('/').trim_end_matches('/'))
        .any(|line| line == pattern)
}

/// コンテキスト直下のエントリ名がパターンに一致するか
fn matches_any_entry(dir: &Path, pattern: &str) -> bool {
    let Ok(pattern) = Pattern::new(pattern) else {
        return false;
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .flatten()
        .any(|entry| pattern.matches(&entry.file_name().to_string_lossy()))
}

fn find_large_files(dir: &Path, threshold: u64) -> Vec<LargeFile> {
    let root = Pattern::escape(&dir.to_string_lossy());
    let Ok(paths) = glob::glob(&format!("{}/**/*", root)) else {
        return Vec::new();
    };

    paths
        .flatten()
        .filter_map(|path| {
            // 壊れたシンボリックリンクなどは無視
            let metadata = fs::metadata(&path).ok()?;
            if metadata.is_file() && metadata.len() > threshold {
                let relative = path.strip_prefix(dir).unwrap_or(&path).to_path_buf();
                Some(LargeFile {
                    path: relative,
                    size: metadata.len(),
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_dockerignore() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("Dockerfile"), "FROM scratch\n").unwrap();

        let report = inspect_build_context(temp_dir.path());
        assert_eq!(report.warnings, vec![ContextWarning::MissingDockerIgnore]);
        assert_eq!(report.suggestions().len(), 1);
    }

    #[test]
    fn test_clean_context() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("Dockerfile"), "FROM scratch\n").unwrap();
        fs::write(temp_dir.path().join(".dockerignore"), ".git\n").unwrap();

        assert!(inspect_build_context(temp_dir.path()).is_clean());
    }

    #[test]
    fn test_double_star_line() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(".dockerignore"), ".git\n**\n").unwrap();

        let report = inspect_build_context(temp_dir.path());
        assert_eq!(report.warnings, vec![ContextWarning::ExcludesEverything(2)]);
    }

    #[test]
    fn test_excludables_not_listed() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();
        fs::create_dir(temp_dir.path().join("node_modules")).unwrap();
        fs::write(temp_dir.path().join("debug.log"), "x").unwrap();
        fs::write(temp_dir.path().join("README.md"), "# hi").unwrap();
        fs::write(temp_dir.path().join(".dockerignore"), "node_modules/\n").unwrap();

        let report = inspect_build_context(temp_dir.path());
        let found = report
            .warnings
            .iter()
            .find_map(|w| match w {
                ContextWarning::NotIgnored(patterns) => Some(patterns.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(found, vec![".git", "*.log", "*.md", "README*"]);
    }

    #[test]
    fn test_file_named_like_directory_is_not_reported() {
        // "test" がファイルの場合はディレクトリ候補に含めない
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("test"), "").unwrap();
        fs::write(temp_dir.path().join(".dockerignore"), "").unwrap();

        assert!(inspect_build_context(temp_dir.path()).is_clean());
    }

    #[test]
    fn test_large_files() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("data");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("small.bin"), vec![0u8; 2048]).unwrap();
        fs::write(nested.join("big.bin"), vec![0u8; 4096]).unwrap();

        let large = find_large_files(temp_dir.path(), 3000);
        assert_eq!(large.len(), 1);
        assert_eq!(large[0].path, PathBuf::from("data/big.bin"));
        assert_eq!(large[0].size, 4096);
    }

    #[test]
    fn test_check_never_fails() {
        let temp_dir = tempdir().unwrap();
        let report = check_build_context(&temp_dir.path().join("missing"));
        assert!(!report.is_clean());
    }
}
