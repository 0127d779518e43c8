use docker_ctp_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Dependency(String),

    #[error("`{command}` failed: {message}")]
    DockerOperation { command: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// エラー種別のラベル
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::Config(_) => "configuration error",
            BuildError::Validation(_) => "validation error",
            BuildError::Auth(_) => "authentication error",
            BuildError::Dependency(_) => "dependency error",
            BuildError::DockerOperation { .. } => "docker operation error",
            BuildError::Io(_) => "io error",
        }
    }

    /// ユーザー向けの 1 行メッセージ
    pub fn user_message(&self) -> String {
        let message = match self {
            BuildError::Dependency(msg) => {
                format!("{} (is Docker installed and running?)", msg)
            }
            _ => self.to_string(),
        };
        // 複数行の stderr などは 1 行にまとめる
        message
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        BuildError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
pub type BuildResult<T> = Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_single_line() {
        let err = BuildError::DockerOperation {
            command: "docker push a/b:1".to_string(),
            message: "denied\n  requested access to the resource is denied\n".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "`docker push a/b:1` failed: denied requested access to the resource is denied"
        );
        assert_eq!(err.kind(), "docker operation error");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: BuildError = ConfigError::InvalidRegistry("quay".to_string()).into();
        assert!(matches!(err, BuildError::Config(_)));
        assert!(err.user_message().contains("Registry must be 'docker' or 'github'"));
    }
}
