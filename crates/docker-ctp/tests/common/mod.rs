use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// 環境から切り離したテスト用ディレクトリ
///
/// HOME と XDG_CONFIG_HOME を一時ディレクトリに向け、
/// ユーザー環境の .env やトークンを読まないようにする。
pub struct TestProject {
    pub root: TempDir,
    home: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            home: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn config_home(&self) -> PathBuf {
        self.home.path().join(".config")
    }

    /// `<root>/<dir>/Dockerfile` を作成し、そのディレクトリを返す
    #[allow(dead_code)]
    pub fn write_dockerfile(&self, dir: &str, content: &str) -> PathBuf {
        let dir = self.root.path().join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Dockerfile"), content).unwrap();
        fs::write(dir.join(".dockerignore"), ".git\n").unwrap();
        dir
    }

    /// ユーザー設定ディレクトリの .env を作成
    #[allow(dead_code)]
    pub fn write_user_env(&self, content: &str) {
        let dir = self.config_home().join("docker-ctp");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(".env"), content).unwrap();
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("docker-ctp").unwrap();
        cmd.current_dir(self.root.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("USER", "ci")
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        for key in [
            "REGISTRY",
            "DOCKER_USERNAME",
            "GITHUB_USERNAME",
            "IMAGE_NAME",
            "TAG",
            "DOCKERFILE_DIR",
            "USE_CACHE",
            "FORCE_REBUILD",
            "DRY_RUN",
            "LOG_LEVEL",
            "CLEANUP_ON_EXIT",
            "NO_CLEANUP",
            "DOCKER_TOKEN",
            "DOCKER_PASSWORD",
            "GITHUB_TOKEN",
            "GHCR_TOKEN",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }
}
