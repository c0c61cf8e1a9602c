use std::time::Duration;
use clap::Parser;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.pollinations.ai/prompt";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Address to bind the service to
    #[arg(long, env = "BUGROCKET_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,
    /// Upstream model name
    #[arg(long, env = "BUGROCKET_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
    /// Google Generative AI key
    #[arg(long, env = "GOOGLE_GENERATIVE_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Generative Language API origin
    #[arg(long, env = "BUGROCKET_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
    /// Hard cap on one completion, first byte to last
    #[arg(long, env = "BUGROCKET_MAX_DURATION_SECS", default_value_t = 30)]
    pub max_duration_secs: u64,
    /// Prefix of generated image URLs
    #[arg(long, env = "BUGROCKET_IMAGE_BASE", default_value = DEFAULT_IMAGE_BASE)]
    pub image_base: String,
}

impl Args {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}
