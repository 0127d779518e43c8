use clap::{Parser, ValueEnum};
use docker_ctp_config::{CliOverrides, LogLevel, Registry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docker-ctp", version)]
#[command(
    about = "Build, tag and push a Docker image to Docker Hub or GitHub Container Registry",
    long_about = None
)]
pub struct Cli {
    /// レジストリのユーザー名（省略時は registry ごとのユーザー名）
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// イメージ名 [default: Dockerfile ディレクトリ名]
    #[arg(short = 'i', long = "image-name")]
    pub image_name: Option<String>,

    /// イメージタグ [default: docker は latest, github は main]
    #[arg(short = 't', long = "image-tag")]
    pub image_tag: Option<String>,

    /// Dockerfile のあるディレクトリ [default: .]
    #[arg(short = 'd', long = "dockerfile-dir")]
    pub dockerfile_dir: Option<PathBuf>,

    /// プッシュ先レジストリ [default: docker]
    #[arg(short = 'g', long, value_enum)]
    pub registry: Option<RegistryArg>,

    /// ビルドキャッシュを使わない
    #[arg(long)]
    pub no_cache: bool,

    /// 既存イメージがあってもビルドする
    #[arg(long)]
    pub force_rebuild: bool,

    /// 実行内容を表示するだけで docker コマンドを実行しない
    #[arg(long)]
    pub dry_run: bool,

    /// 詳細ログ
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// エラー以外を表示しない
    #[arg(long)]
    pub quiet: bool,

    /// 終了時にローカルイメージを削除しない
    #[arg(long)]
    pub no_cleanup: bool,

    /// .env と .dockerignore のテンプレートを生成して終了
    #[arg(long)]
    pub generate_config: bool,

    /// バナーを表示して終了
    #[arg(long)]
    pub banner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegistryArg {
    Docker,
    Github,
}

impl From<RegistryArg> for Registry {
    fn from(arg: RegistryArg) -> Self {
        match arg {
            RegistryArg::Docker => Registry::Docker,
            RegistryArg::Github => Registry::Github,
        }
    }
}

impl Cli {
    /// `--verbose` / `--quiet` のどちらも無ければ `None`
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Verbose)
        } else if self.quiet {
            Some(LogLevel::Quiet)
        } else {
            None
        }
    }

    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            registry: self.registry.map(Registry::from),
            username: self.username.clone(),
            image_name: self.image_name.clone(),
            tag: self.image_tag.clone(),
            dockerfile_dir: self.dockerfile_dir.clone(),
            no_cache: self.no_cache,
            force_rebuild: self.force_rebuild,
            dry_run: self.dry_run,
            log_level: self.log_level(),
            no_cleanup: self.no_cleanup,
        }
    }
}
