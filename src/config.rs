use clap::Parser;
use once_cell::sync::Lazy;
use std::time::Duration;

pub static APP_CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    Config::parse()
});

#[derive(Debug, Parser)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env)]
    pub database_uri: String,

    #[clap(long, env)]
    pub database_name: String,

    #[clap(long, env)]
    pub log_level: String,

    #[clap(long, env, default_value_t = false)]
    pub swagger_enabled: bool,

    #[clap(long, env, value_delimiter = ',')]
    pub cors_origin_whitelist: Option<Vec<String>>,

    #[clap(long, env)]
    pub jwt_secret_key: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,

    /// Upper bound for each store call made by the booking decision workflow.
    #[clap(long, env, default_value_t = 10_000)]
    pub workflow_step_timeout_ms: u64,
}

impl Config {
    pub fn workflow_step_timeout(&self) -> Duration {
        Duration::from_millis(self.workflow_step_timeout_ms)
    }
}
