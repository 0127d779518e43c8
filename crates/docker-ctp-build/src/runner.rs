//! 外部コマンドの実行
//!
//! dry-run ではコマンドラインをログに出すだけで、プロセスは一切起動しない。

use crate::error::{BuildError, BuildResult};
use crate::progress::CommandProgress;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// 実行するコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// 標準入力に流す内容（ログには出さない）
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// ログ表示用のコマンドライン
    pub fn display(&self) -> String {
        format_command(&self.program, &self.args)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// 失敗時の診断メッセージ（stderr 優先、無ければ stdout）
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// プロセス起動の抽象化
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput>;
}

/// `tokio::process` で実際にコマンドを起動する
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn execute(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        tracing::debug!("Running: {}", spec.display());

        let mut child = cmd.spawn()?;
        if let (Some(input), Some(mut stdin)) = (spec.stdin.as_deref(), child.stdin.take()) {
            // 入力を読む前に終了したプロセスの診断は wait_with_output で拾う
            match stdin.write_all(input.as_bytes()).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!("`{}` closed stdin early", spec.program);
                }
                Err(e) => return Err(e),
            }
            // EOF を送る
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// dry-run とスピナー表示を扱うコマンドランナー
#[derive(Clone)]
pub struct Runner {
    executor: Arc<dyn CommandExecutor>,
    dry_run: bool,
    show_progress: bool,
}

impl Runner {
    pub fn new(executor: Arc<dyn CommandExecutor>, dry_run: bool) -> Self {
        Self {
            executor,
            dry_run,
            show_progress: false,
        }
    }

    pub fn system(dry_run: bool) -> Self {
        Self::new(Arc::new(SystemExecutor), dry_run)
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// コマンドを実行し、非ゼロ終了は `DockerOperation` エラーにする
    pub async fn run(&self, spec: &CommandSpec, message: &str) -> BuildResult<CommandOutput> {
        if self.dry_run {
            tracing::info!("DRY-RUN {}", spec.display());
            return Ok(CommandOutput {
                success: true,
                code: Some(0),
                ..Default::default()
            });
        }

        let progress = self.show_progress.then(|| CommandProgress::start(message));
        let result = self.execute(spec).await;

        match (&result, &progress) {
            (Ok(_), Some(p)) => p.finish_success(message),
            (Err(_), Some(p)) => p.finish_error(message),
            _ => {}
        }
        result
    }

    /// 成否だけを知りたい問い合わせ（`docker image inspect` など）
    ///
    /// 非ゼロ終了は `false`。dry-run では実行せず `false` を返す。
    pub async fn probe(&self, spec: &CommandSpec) -> BuildResult<bool> {
        if self.dry_run {
            tracing::info!("DRY-RUN {}", spec.display());
            return Ok(false);
        }

        let output = self
            .executor
            .execute(spec)
            .await
            .map_err(|e| spawn_error(spec, e))?;
        tracing::debug!("`{}` exited with {:?}", spec.display(), output.code);
        Ok(output.success)
    }

    async fn execute(&self, spec: &CommandSpec) -> BuildResult<CommandOutput> {
        let output = self
            .executor
            .execute(spec)
            .await
            .map_err(|e| spawn_error(spec, e))?;

        if !output.success {
            return Err(BuildError::DockerOperation {
                command: spec.display(),
                message: output.diagnostics(),
            });
        }
        Ok(output)
    }
}

fn spawn_error(spec: &CommandSpec, e: std::io::Error) -> BuildError {
    if e.kind() == std::io::ErrorKind::NotFound {
        BuildError::Dependency(format!("{} not found", spec.program))
    } else {
        BuildError::Io(e)
    }
}

/// シェルで貼り付けられる形に整形
pub fn format_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(|part| {
            let needs_quote = part
                .contains(|c: char| c.is_whitespace() || "'\"$`\\|&;<>()*?".contains(c));
            if part.is_empty() || needs_quote {
                shell_escape(part)
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn shell_escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
