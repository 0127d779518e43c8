//! login → build → tag → push のパイプライン
//!
//! どのステップで失敗しても、cleanup-on-exit が有効なら後片付けは必ず行う。

use crate::auth::{TokenPrompt, lookup_token};
use crate::cleanup::{CleanupManager, CleanupReport};
use crate::docker::Docker;
use crate::error::BuildResult;
use docker_ctp_config::{Config, EnvSnapshot};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Login,
    Build,
    Tag,
    Push,
    Cleanup,
}

impl PipelineStep {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Build => "build",
            Self::Tag => "tag",
            Self::Push => "push",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub local_tag: String,
    pub remote_image: String,
    /// 既存イメージがあってビルドを省略した
    pub build_skipped: bool,
    pub cleanup: Option<CleanupReport>,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    docker: Docker,
    env: &'a EnvSnapshot,
    prompt: &'a dyn TokenPrompt,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        docker: Docker,
        env: &'a EnvSnapshot,
        prompt: &'a dyn TokenPrompt,
    ) -> Self {
        Self {
            config,
            docker,
            env,
            prompt,
        }
    }

    pub async fn run(&self) -> BuildResult<PipelineReport> {
        let mut cleanup = CleanupManager::new();
        let result = self.run_steps(&mut cleanup).await;

        let cleanup_report = if self.config.cleanup_on_exit {
            tracing::debug!("Step: {}", PipelineStep::Cleanup);
            Some(cleanup.cleanup_all(&self.docker).await)
        } else {
            if !cleanup.is_empty() {
                tracing::info!("Cleanup disabled, keeping {}", cleanup.images().join(", "));
            }
            None
        };

        let mut report = result?;
        report.cleanup = cleanup_report;
        Ok(report)
    }

    async fn run_steps(&self, cleanup: &mut CleanupManager) -> BuildResult<PipelineReport> {
        self.login().await?;
        let build_skipped = self.build().await?;
        let remote_image = self.tag().await?;
        cleanup.register(self.config.local_tag());
        self.push(&remote_image).await?;

        Ok(PipelineReport {
            local_tag: self.config.local_tag(),
            remote_image,
            build_skipped,
            cleanup: None,
        })
    }

    async fn login(&self) -> BuildResult<()> {
        tracing::debug!("Step: {}", PipelineStep::Login);
        if self.docker.runner().is_dry_run() {
            tracing::info!("DRY-RUN skipping registry login");
            return Ok(());
        }
        let token = lookup_token(self.config.registry, self.env, self.prompt)?;
        self.docker
            .login(self.config.registry, &self.config.username, &token)
            .await
    }

    /// 戻り値は「ビルドを省略したか」
    async fn build(&self) -> BuildResult<bool> {
        tracing::debug!("Step: {}", PipelineStep::Build);
        let tag = self.config.local_tag();

        if !self.config.force_rebuild && self.docker.image_exists(&tag).await? {
            tracing::info!("Image {} already exists, skipping build", tag);
            return Ok(true);
        }

        self.docker
            .build(&tag, &self.config.dockerfile_dir, self.config.use_cache)
            .await?;
        Ok(false)
    }

    async fn tag(&self) -> BuildResult<String> {
        tracing::debug!("Step: {}", PipelineStep::Tag);
        let remote = self.config.registry_image();
        self.docker.tag(&self.config.local_tag(), &remote).await?;
        Ok(remote)
    }

    async fn push(&self, remote_image: &str) -> BuildResult<()> {
        tracing::debug!("Step: {}", PipelineStep::Push);
        self.docker.push(remote_image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NonInteractive;
    use crate::error::BuildError;
    use crate::runner::Runner;
    use crate::test_support::RecordingExecutor;
    use docker_ctp_config::Registry;
    use std::sync::Arc;

    fn config(registry: Registry) -> Config {
        let mut config = Config {
            registry,
            docker_username: "dockeruser".to_string(),
            github_username: "ghuser".to_string(),
            image_name: "myimage".to_string(),
            tag: "1.0.0".to_string(),
            ..Default::default()
        };
        config.apply_defaults();
        config
    }

    fn token_env() -> EnvSnapshot {
        EnvSnapshot::from_pairs([("DOCKER_TOKEN", "tok"), ("GITHUB_TOKEN", "ghp")])
    }

    fn docker(executor: &Arc<RecordingExecutor>, dry_run: bool) -> Docker {
        Docker::new(Runner::new(executor.clone(), dry_run))
    }

    #[tokio::test]
    async fn test_full_run_existing_image_skips_build() {
        let executor = RecordingExecutor::new();
        let config = config(Registry::Docker);
        let env = token_env();

        let report = Pipeline::new(&config, docker(&executor, false), &env, &NonInteractive)
            .run()
            .await
            .unwrap();

        assert!(report.build_skipped);
        assert_eq!(report.remote_image, "dockeruser/myimage:1.0.0");
        assert_eq!(
            executor.command_lines(),
            vec![
                "docker login -u dockeruser --password-stdin",
                "docker image inspect myimage:1.0.0",
                "docker tag myimage:1.0.0 dockeruser/myimage:1.0.0",
                "docker push dockeruser/myimage:1.0.0",
                "docker rmi myimage:1.0.0",
            ]
        );
    }

    #[tokio::test]
    async fn test_build_when_missing_or_forced() {
        let executor = RecordingExecutor::new();
        executor.fail_when("inspect", "No such image");
        let mut config = config(Registry::Github);
        config.use_cache = false;
        config.cleanup_on_exit = false;
        let env = token_env();

        let report = Pipeline::new(&config, docker(&executor, false), &env, &NonInteractive)
            .run()
            .await
            .unwrap();
        assert!(!report.build_skipped);
        assert!(report.cleanup.is_none());
        assert!(
            executor
                .command_lines()
                .contains(&"docker build --no-cache -t myimage:1.0.0 .".to_string())
        );

        let executor = RecordingExecutor::new();
        config.force_rebuild = true;
        Pipeline::new(&config, docker(&executor, false), &env, &NonInteractive)
            .run()
            .await
            .unwrap();
        let lines = executor.command_lines();
        assert!(!lines.iter().any(|l| l.contains("inspect")));
        assert!(lines.iter().any(|l| l.starts_with("docker build")));
        assert!(lines.contains(&"docker push ghcr.io/ghuser/myimage:1.0.0".to_string()));
    }

    #[tokio::test]
    async fn test_push_failure_still_cleans_up() {
        let executor = RecordingExecutor::new();
        executor.fail_when("push", "denied");
        let config = config(Registry::Docker);
        let env = token_env();

        let err = Pipeline::new(&config, docker(&executor, false), &env, &NonInteractive)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::DockerOperation { .. }));
        assert_eq!(
            executor.command_lines().last().map(String::as_str),
            Some("docker rmi myimage:1.0.0")
        );
    }

    /// ビルド失敗では tag 以降に進まず、未登録なので rmi もしない
    #[tokio::test]
    async fn test_build_failure_stops_before_tag() {
        let executor = RecordingExecutor::new();
        executor.fail_when("inspect", "No such image");
        executor.fail_when("build", "failed to solve: dockerfile parse error");
        let config = config(Registry::Docker);
        let env = token_env();

        let err = Pipeline::new(&config, docker(&executor, false), &env, &NonInteractive)
            .run()
            .await
            .unwrap_err();

        match err {
            BuildError::DockerOperation { command, message } => {
                assert_eq!(command, "docker build -t myimage:1.0.0 .");
                assert_eq!(message, "failed to solve: dockerfile parse error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            executor.command_lines(),
            vec![
                "docker login -u dockeruser --password-stdin",
                "docker image inspect myimage:1.0.0",
                "docker build -t myimage:1.0.0 .",
            ]
        );
    }

    #[tokio::test]
    async fn test_tag_failure_stops_before_push() {
        let executor = RecordingExecutor::new();
        executor.fail_when("tag", "Error response from daemon: No such image");
        let config = config(Registry::Docker);
        let env = token_env();

        let err = Pipeline::new(&config, docker(&executor, false), &env, &NonInteractive)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::DockerOperation { .. }));
        let lines = executor.command_lines();
        assert_eq!(
            lines,
            vec![
                "docker login -u dockeruser --password-stdin",
                "docker image inspect myimage:1.0.0",
                "docker tag myimage:1.0.0 dockeruser/myimage:1.0.0",
            ]
        );
        assert!(!lines.iter().any(|l| l.starts_with("docker push")));
        assert!(!lines.iter().any(|l| l.starts_with("docker rmi")));
    }

    #[tokio::test]
    async fn test_login_failure_aborts_before_build() {
        let executor = RecordingExecutor::new();
        let config = config(Registry::Docker);
        let env = EnvSnapshot::default();

        let err = Pipeline::new(&config, docker(&executor, false), &env, &NonInteractive)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::Auth(_)));
        // 何も登録されていないので rmi も走らない
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_invokes_nothing() {
        let executor = RecordingExecutor::new();
        let config = config(Registry::Docker);
        let env = EnvSnapshot::default();

        let report = Pipeline::new(&config, docker(&executor, true), &env, &NonInteractive)
            .run()
            .await
            .unwrap();

        assert!(!report.build_skipped);
        assert_eq!(
            report.cleanup.unwrap().removed,
            vec!["myimage:1.0.0".to_string()]
        );
        assert!(executor.calls().is_empty());
    }
}
