use anyhow::{Context, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::Theme;
use crate::carousel::CarouselSettings;
use crate::github::client::DEFAULT_API_BASE;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub content_path: PathBuf,
    pub static_dir: PathBuf,
    pub github_api_base: String,
    pub github_token: Option<String>,
    /// Overrides the username taken from the site's GitHub link.
    pub github_username: Option<String>,
    pub repo_refresh_interval: Duration,
    pub carousel: CarouselSettings,
    pub contact_delay: Duration,
    pub theme: Theme,
    pub log_json: bool,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            content_path: PathBuf::from("content/site.yaml"),
            static_dir: PathBuf::from("frontend"),
            github_api_base: DEFAULT_API_BASE.to_string(),
            github_token: None,
            github_username: None,
            repo_refresh_interval: Duration::from_secs(3600),
            carousel: CarouselSettings::default(),
            contact_delay: Duration::from_millis(1500),
            theme: Theme::default(),
            log_json: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(addr) = get("PORTFOLIO_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("PORTFOLIO_BIND_ADDR is not a socket address: {}", addr))?;
        }
        if let Some(path) = get("PORTFOLIO_CONTENT_PATH") {
            config.content_path = PathBuf::from(path);
        }
        if let Some(dir) = get("PORTFOLIO_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(base) = get("GITHUB_API_BASE") {
            config.github_api_base = base;
        }
        config.github_token = get("GITHUB_TOKEN");
        config.github_username = get("GITHUB_USERNAME");

        if let Some(secs) = get("REPO_REFRESH_SECS") {
            config.repo_refresh_interval = Duration::from_secs(parse_number("REPO_REFRESH_SECS", &secs)?);
        }
        if let Some(ms) = get("CAROUSEL_AUTOPLAY_MS") {
            config.carousel.autoplay_interval =
                Duration::from_millis(parse_number("CAROUSEL_AUTOPLAY_MS", &ms)?);
        }
        if let Some(ms) = get("CAROUSEL_RESUME_MS") {
            // 0 = stay paused after user interaction
            config.carousel.resume_after = match parse_number("CAROUSEL_RESUME_MS", &ms)? {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            };
        }
        if let Some(flag) = get("CAROUSEL_PAUSE_ON_HOVER") {
            config.carousel.pause_on_hover = parse_flag("CAROUSEL_PAUSE_ON_HOVER", &flag)?;
        }
        if let Some(ms) = get("CONTACT_DELAY_MS") {
            config.contact_delay = Duration::from_millis(parse_number("CONTACT_DELAY_MS", &ms)?);
        }
        if let Some(theme) = get("PORTFOLIO_THEME") {
            config.theme = theme.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(flag) = get("PORTFOLIO_LOG_JSON") {
            config.log_json = parse_flag("PORTFOLIO_LOG_JSON", &flag)?;
        }
        config.log_dir = get("PORTFOLIO_LOG_DIR").map(PathBuf::from);

        anyhow::ensure!(
            !config.carousel.autoplay_interval.is_zero(),
            "CAROUSEL_AUTOPLAY_MS must be greater than zero"
        );
        anyhow::ensure!(
            !config.repo_refresh_interval.is_zero(),
            "REPO_REFRESH_SECS must be greater than zero"
        );

        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be a boolean, got {:?}", key, value),
    }
}
