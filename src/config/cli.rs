use crate::config::RunnerConfig;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "reward-runner")]
#[command(about = "Registers a disposable account and claims the sign-up rewards")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with runner overrides")]
    pub config: Option<String>,

    #[arg(long)]
    pub page_url: Option<String>,

    #[arg(long)]
    pub mail_api_base: Option<String>,

    #[arg(long, help = "Chrome/Chromium executable, falls back to CHROME_PATH")]
    pub chrome_path: Option<String>,

    #[arg(long, help = "Where the diagnostic screenshot is written")]
    pub screenshot_path: Option<String>,

    #[arg(long, default_value = ".", help = "Base directory for artifacts")]
    pub output_dir: String,

    #[arg(long, help = "Show the browser window")]
    pub headed: bool,

    #[arg(long, help = "Log process CPU and memory between stages")]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Layers the flags over the TOML file (if any) over the defaults.
    pub fn runner_config(&self) -> Result<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::from_file(path)?,
            None => RunnerConfig::default(),
        };

        if let Some(url) = &self.page_url {
            config.page_url = url.clone();
        }
        if let Some(base) = &self.mail_api_base {
            config.mail_api_base = base.clone();
        }
        if let Some(path) = &self.chrome_path {
            config.chrome_path = Some(path.clone());
        }
        if let Some(path) = &self.screenshot_path {
            config.screenshot_path = path.clone();
        }
        if self.headed {
            config.headless = false;
        }

        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_dir", &self.output_dir)?;
        self.runner_config()?.validate()
    }
}
