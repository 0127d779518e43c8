//! docker-ctp のビルド・プッシュ処理
//!
//! 設定の検証、docker CLI の呼び出し、login → build → tag → push の
//! パイプラインと後片付けを提供する。

pub mod auth;
pub mod cleanup;
pub mod context;
pub mod deps;
pub mod docker;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod runner;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use auth::{NonInteractive, TerminalPrompt, TokenPrompt, lookup_token};
pub use cleanup::{CleanupManager, CleanupReport};
pub use context::{ContextReport, ContextWarning, check_build_context};
pub use deps::check_dependencies;
pub use docker::Docker;
pub use error::{BuildError, BuildResult};
pub use pipeline::{Pipeline, PipelineReport, PipelineStep};
pub use progress::CommandProgress;
pub use runner::{CommandExecutor, CommandOutput, CommandSpec, Runner, SystemExecutor};
pub use validate::validate_config;
