use std::env;
use std::path::PathBuf;

/// AppConfig
///
/// Holds the client's configuration state. Immutable once loaded; the `App` assembly
/// clones the pieces each service needs.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Backend REST base, including the API path (e.g. "http://localhost:5000/api").
    pub api_base_url: String,
    // Where the durable session (token + user) is persisted. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
    // Runtime environment marker. Selects the log output format.
    pub env: Env,
}

/// Env
///
/// Runtime context: pretty logs for local debugging, JSON logs in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// Default API base used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

impl Default for AppConfig {
    /// default
    ///
    /// Local values that need no environment variables, primarily for tests.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: None,
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (`.env` is honoured by the binary
    /// through `dotenv` before this runs).
    ///
    /// * `APP_ENV`: `production` or anything else for local.
    /// * `ROADFY_API_BASE_URL`: backend base URL including `/api`.
    /// * `ROADFY_SESSION_FILE`: path of the persisted session. In production it defaults to
    ///   `roadfy-session.json` in the working directory so sessions survive restarts.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = env::var("ROADFY_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let session_file = match env::var("ROADFY_SESSION_FILE") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => match env {
                Env::Production => Some(PathBuf::from("roadfy-session.json")),
                Env::Local => None,
            },
        };

        Self {
            api_base_url,
            session_file,
            env,
        }
    }
}
