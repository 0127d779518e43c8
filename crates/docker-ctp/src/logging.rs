use docker_ctp_config::LogLevel;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// stderr への tracing 出力を設定
///
/// `RUST_LOG` が設定されていればそちらを優先する。
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));

    // 二重初期化は無視
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
