use crate::runner::{CommandExecutor, CommandOutput, CommandSpec};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// 実行されたコマンドを記録するテスト用 executor
///
/// `fail_when` に登録した引数を含むコマンドは非ゼロ終了として扱う。
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<CommandSpec>>,
    failures: Mutex<Vec<(String, String)>>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_when(&self, arg: &str, stderr: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((arg.to_string(), stderr.to_string()));
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// 記録されたコマンドライン
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::display).collect()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());

        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(arg, _)| spec.args.iter().any(|a| a == arg))
            .map(|(_, stderr)| stderr.clone());

        Ok(match failure {
            Some(stderr) => CommandOutput {
                success: false,
                code: Some(1),
                stdout: String::new(),
                stderr,
            },
            None => CommandOutput {
                success: true,
                code: Some(0),
                ..Default::default()
            },
        })
    }
}
