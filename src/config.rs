use color_eyre::Result;
use color_eyre::eyre::Context;
use serde::Deserialize;

/// Environment-backed configuration. Loaded once in `main` and passed down
/// explicitly; the Slack credential never lives in a global.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub slack_webhook_url: String,
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_state_dir() -> String {
    "state".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36".into()
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().wrap_err("failed to load config")
    }
}
