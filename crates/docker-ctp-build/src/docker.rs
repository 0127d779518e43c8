//! docker CLI ラッパー
//!
//! 各操作は `docker` サブコマンド 1 回の呼び出しに対応する。

use crate::error::BuildResult;
use crate::runner::{CommandSpec, Runner};
use docker_ctp_config::Registry;
use std::path::Path;

pub const DOCKER_PROGRAM: &str = "docker";

pub fn login_command(registry: Registry, username: &str, token: &str) -> CommandSpec {
    let mut spec = CommandSpec::new(DOCKER_PROGRAM).arg("login");
    if let Some(server) = registry.login_server() {
        spec = spec.arg(server);
    }
    spec.args(["-u", username, "--password-stdin"]).stdin(token)
}

pub fn inspect_command(tag: &str) -> CommandSpec {
    CommandSpec::new(DOCKER_PROGRAM).args(["image", "inspect", tag])
}

pub fn build_command(tag: &str, context_dir: &Path, use_cache: bool) -> CommandSpec {
    let mut spec = CommandSpec::new(DOCKER_PROGRAM).arg("build");
    if !use_cache {
        spec = spec.arg("--no-cache");
    }
    spec.args(["-t", tag])
        .arg(context_dir.to_string_lossy().into_owned())
}

pub fn tag_command(source: &str, target: &str) -> CommandSpec {
    CommandSpec::new(DOCKER_PROGRAM).args(["tag", source, target])
}

pub fn push_command(image: &str) -> CommandSpec {
    CommandSpec::new(DOCKER_PROGRAM).args(["push", image])
}

pub fn remove_command(image: &str) -> CommandSpec {
    CommandSpec::new(DOCKER_PROGRAM).args(["rmi", image])
}

pub fn info_command() -> CommandSpec {
    CommandSpec::new(DOCKER_PROGRAM).arg("info")
}

/// docker CLI の操作
#[derive(Clone)]
pub struct Docker {
    runner: Runner,
}

impl Docker {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// トークンを標準入力で渡してログイン
    pub async fn login(&self, registry: Registry, username: &str, token: &str) -> BuildResult<()> {
        let target = registry.login_server().unwrap_or("Docker Hub");
        tracing::info!("Logging in to {} as {}", target, username);
        self.runner
            .run(
                &login_command(registry, username, token),
                &format!("Logging in to {}", target),
            )
            .await?;
        tracing::info!("Login succeeded");
        Ok(())
    }

    /// ローカルにイメージが存在するか
    pub async fn image_exists(&self, tag: &str) -> BuildResult<bool> {
        self.runner.probe(&inspect_command(tag)).await
    }

    pub async fn build(&self, tag: &str, context_dir: &Path, use_cache: bool) -> BuildResult<()> {
        tracing::info!("Building image {} from {}", tag, context_dir.display());
        if !use_cache {
            tracing::debug!("Build cache disabled");
        }
        self.runner
            .run(
                &build_command(tag, context_dir, use_cache),
                &format!("Building {}", tag),
            )
            .await?;
        Ok(())
    }

    pub async fn tag(&self, source: &str, target: &str) -> BuildResult<()> {
        tracing::info!("Tagging {} as {}", source, target);
        self.runner
            .run(&tag_command(source, target), &format!("Tagging {}", target))
            .await?;
        Ok(())
    }

    pub async fn push(&self, image: &str) -> BuildResult<()> {
        tracing::info!("Pushing {}", image);
        self.runner
            .run(&push_command(image), &format!("Pushing {}", image))
            .await?;
        Ok(())
    }

    pub async fn remove_image(&self, image: &str) -> BuildResult<()> {
        self.runner
            .run(&remove_command(image), &format!("Removing {}", image))
            .await?;
        Ok(())
    }

    /// デーモンの死活確認（`docker info`）
    pub async fn daemon_available(&self) -> BuildResult<bool> {
        self.runner.probe(&info_command()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingExecutor;
    use std::path::PathBuf;

    #[test]
    fn test_login_command() {
        let spec = login_command(Registry::Docker, "me", "secret");
        assert_eq!(spec.args, vec!["login", "-u", "me", "--password-stdin"]);
        assert_eq!(spec.stdin.as_deref(), Some("secret"));

        let spec = login_command(Registry::Github, "me", "secret");
        assert_eq!(
            spec.args,
            vec!["login", "ghcr.io", "-u", "me", "--password-stdin"]
        );
    }

    #[test]
    fn test_build_command() {
        let dir = PathBuf::from("./app");
        assert_eq!(
            build_command("app:1.0", &dir, true).display(),
            "docker build -t app:1.0 ./app"
        );
        assert_eq!(
            build_command("app:1.0", &dir, false).display(),
            "docker build --no-cache -t app:1.0 ./app"
        );
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(
            tag_command("app:1", "me/app:1").display(),
            "docker tag app:1 me/app:1"
        );
        assert_eq!(push_command("me/app:1").display(), "docker push me/app:1");
        assert_eq!(remove_command("app:1").display(), "docker rmi app:1");
        assert_eq!(
            inspect_command("app:1").display(),
            "docker image inspect app:1"
        );
    }

    #[tokio::test]
    async fn test_operations_go_through_runner() {
        let executor = RecordingExecutor::new();
        let docker = Docker::new(Runner::new(executor.clone(), false));

        docker
            .login(Registry::Github, "octo", "ghp_token")
            .await
            .unwrap();
        docker.tag("app:main", "ghcr.io/octo/app:main").await.unwrap();
        docker.push("ghcr.io/octo/app:main").await.unwrap();

        assert_eq!(
            executor.command_lines(),
            vec![
                "docker login ghcr.io -u octo --password-stdin",
                "docker tag app:main ghcr.io/octo/app:main",
                "docker push ghcr.io/octo/app:main",
            ]
        );
        assert_eq!(executor.calls()[0].stdin.as_deref(), Some("ghp_token"));
    }

    #[tokio::test]
    async fn test_image_exists() {
        let executor = RecordingExecutor::new();
        let docker = Docker::new(Runner::new(executor.clone(), false));
        assert!(docker.image_exists("app:1").await.unwrap());

        executor.fail_when("inspect", "Error: No such image: app:1");
        assert!(!docker.image_exists("app:1").await.unwrap());
    }
}
