use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_ADMIN_TOKEN: &str = "admin_secret_change_me";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
    // 未登录请求被重定向到这里，并附带 ?next=<原路径>
    pub login_url: String,
    // 文章详情页前缀，重定向目标为 {prefix}{article_id}/
    pub article_url_prefix: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    pub admin_token: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();
        let env_json =
            serde_json::to_string(&env_map).map_err(|e| ConfigError::Message(e.to_string()))?;

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origins", "*")?
            .set_default("server.login_url", "/accounts/login/")?
            .set_default("server.article_url_prefix", "/news/")?
            .set_default("database.url", "sqlite://data/comments.db")?
            .set_default("security.admin_token", DEFAULT_ADMIN_TOKEN)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(&env_json, config::FileFormat::Json))
            .build()?;

        s.try_deserialize()
    }
}

// CUMMENTS_SERVER__PORT=8080 -> server.port
fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("CUMMENTS_"))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches("CUMMENTS_")
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}
