//! レジストリ認証トークンの取得
//!
//! 環境スナップショットを優先順に調べ、見つからなければ端末で入力を求める。
//! プロセス環境は読み書きしない。

use crate::error::{BuildError, BuildResult};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use docker_ctp_config::{EnvSnapshot, Registry};
use std::io::{IsTerminal, Write};

/// トークン入力の抽象化
pub trait TokenPrompt: Send + Sync {
    /// 入力を求める。対話できない場合は `Ok(None)`
    fn prompt(&self, registry: Registry) -> BuildResult<Option<String>>;
}

/// 対話不可（CI など）
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl TokenPrompt for NonInteractive {
    fn prompt(&self, _registry: Registry) -> BuildResult<Option<String>> {
        Ok(None)
    }
}

/// 端末からエコーなしで読み取る
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TokenPrompt for TerminalPrompt {
    fn prompt(&self, registry: Registry) -> BuildResult<Option<String>> {
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }

        let mut stderr = std::io::stderr();
        write!(stderr, "Enter {} token: ", registry)?;
        stderr.flush()?;

        let token = {
            let _guard = RawModeGuard::enable()?;
            read_hidden_line()?
        };
        writeln!(stderr)?;

        Ok(Some(token))
    }
}

/// Drop で raw mode を必ず戻す
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> BuildResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_hidden_line() -> BuildResult<String> {
    let mut input = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(input),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(BuildError::Auth("Token input cancelled".to_string()));
            }
            KeyCode::Esc => {
                return Err(BuildError::Auth("Token input cancelled".to_string()));
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }
}

/// レジストリ用のトークンを取得
///
/// docker: `DOCKER_TOKEN` → `DOCKER_PASSWORD`、github: `GITHUB_TOKEN` → `GHCR_TOKEN`
/// の順に調べ、どれも無ければ `prompt` に委ねる。
pub fn lookup_token(
    registry: Registry,
    env: &EnvSnapshot,
    prompt: &dyn TokenPrompt,
) -> BuildResult<String> {
    let vars = registry.token_env_vars();
    for var in vars {
        if let Some(token) = env.get_non_empty(var) {
            tracing::debug!("Using {} token from {}", registry, var);
            return Ok(token.to_string());
        }
    }

    match prompt.prompt(registry)? {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err(BuildError::Auth(format!("No {} token provided", registry))),
        None => Err(BuildError::Auth(format!(
            "Environment variable {} not set",
            vars.join(" or ")
        ))),
    }
}
