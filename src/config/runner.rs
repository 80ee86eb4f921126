use crate::utils::error::{ClaimError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PAGE_URL: &str = "https://www.arenabreakoutinfinite.com/en/index.html";
pub const DEFAULT_MAIL_API_BASE: &str = "https://www.1secmail.com/api/v1/";
pub const DEFAULT_ISSUER_DOMAIN: &str = "LevelInfinitePass.account.levelinfinite.com";
pub const DEFAULT_SCREENSHOT_PATH: &str = "foo.png";

/// Everything a run needs. Defaults reproduce the fixed flow exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    pub page_url: String,
    pub mail_api_base: String,
    pub issuer_domain: String,
    pub poll_interval_secs: u64,
    pub max_attempts: u32,
    pub code_length: usize,
    pub screenshot_path: String,
    pub chrome_path: Option<String>,
    pub headless: bool,
    pub step_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            mail_api_base: DEFAULT_MAIL_API_BASE.to_string(),
            issuer_domain: DEFAULT_ISSUER_DOMAIN.to_string(),
            poll_interval_secs: 5,
            max_attempts: 10,
            code_length: 5,
            screenshot_path: DEFAULT_SCREENSHOT_PATH.to_string(),
            chrome_path: None,
            headless: true,
            step_timeout_secs: 30,
        }
    }
}

impl RunnerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ClaimError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("page_url", &self.page_url)?;
        validation::validate_url("mail_api_base", &self.mail_api_base)?;
        validation::validate_domain("issuer_domain", &self.issuer_domain)?;
        validation::validate_range("max_attempts", self.max_attempts, 1, 1000)?;
        validation::validate_range("code_length", self.code_length, 1, 64)?;
        validation::validate_range("step_timeout_secs", self.step_timeout_secs, 1, 600)?;
        validation::validate_path("screenshot_path", &self.screenshot_path)?;

        if let Some(chrome_path) = &self.chrome_path {
            validation::validate_path("chrome_path", chrome_path)?;
        }

        tracing::debug!("✅ Runner configuration validation passed");
        Ok(())
    }
}
