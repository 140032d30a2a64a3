use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_SESSION_FILE: &str = ".alumni-console/session.json";
const DEFAULT_SESSION_NAMESPACE: &str = "alumni-console";
const DEFAULT_PREDICTION_LIMIT: u32 = 10;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// 会话持久化后端
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    File(PathBuf),
    Redis(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub session_backend: SessionBackend,
    pub session_namespace: String,
    pub prediction_limit: u32,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，数值无效时回退到默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = var("API_BASE_URL")
            .ok_or(ConfigError::Missing("API_BASE_URL"))?
            .trim_end_matches('/')
            .to_string();

        let session_backend = match var("SESSION_BACKEND").as_deref().map(str::trim) {
            None | Some("file") => SessionBackend::File(
                var("SESSION_FILE")
                    .unwrap_or_else(|| DEFAULT_SESSION_FILE.into())
                    .into(),
            ),
            Some("memory") => SessionBackend::Memory,
            Some("redis") => {
                SessionBackend::Redis(var("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?)
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "SESSION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let http_timeout_secs = var("HTTP_TIMEOUT")
            .and_then(|v| v.trim().trim_end_matches('s').parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Config {
            api_base_url,
            server_host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.into()),
            server_port: var("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            session_backend,
            session_namespace: var("SESSION_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_SESSION_NAMESPACE.into()),
            prediction_limit: var("PREDICTION_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PREDICTION_LIMIT),
            http_timeout_secs,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
