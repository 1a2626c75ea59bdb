use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub allow_origins: Vec<String>,
    /// Preflight cache lifetime in seconds.
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: default_cors_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Default per-user quota, seeded at `limits/defaultLimit` on startup.
#[derive(Debug, Deserialize, Clone)]
pub struct QuotaConfig {
    pub max_amount: i64,
    pub max_upload_size_kb: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub quota: QuotaConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("auth.jwt_secret", "insecure-dev-secret")?
            .set_default("quota.max_amount", 20)?
            .set_default("quota.max_upload_size_kb", 256)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SNIPPETD__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("SNIPPETD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
