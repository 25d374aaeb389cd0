use std::env;

use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_env")]
    pub env: String, // file / server
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub prefix: Option<String>,
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Root directory served under `/uploads`.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_env() -> String {
    "file".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Config {
    pub fn api_prefix(&self) -> String {
        self.prefix.clone().unwrap_or("/api".to_string())
    }

    /// Where the values came from, for the startup log.
    pub fn source(&self) -> &'static str {
        if self.env == "file" {
            ".env file"
        } else {
            "server environment"
        }
    }
}

pub fn get_config() -> anyhow::Result<Config> {
    let env_var = env::var("ENV").unwrap_or("file".to_string());
    if env_var == "file" {
        let _ = dotenvy::dotenv();
    }
    Ok(envy::from_env::<Config>()?)
}
