use crate::config::RunnerConfig;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::env;

/// Lambda settings. Every variable is optional; with none set the run is
/// identical to the CLI defaults.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub runner: RunnerConfig,
    pub artifact_bucket: Option<String>,
    pub artifact_prefix: String,
    pub artifact_region: String,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut runner = RunnerConfig::default();
        if let Some(url) = lookup("PAGE_URL") {
            runner.page_url = url;
        }
        if let Some(base) = lookup("MAIL_API_BASE") {
            runner.mail_api_base = base;
        }
        if let Some(path) = lookup("SCREENSHOT_PATH") {
            runner.screenshot_path = path;
        }
        runner.chrome_path = lookup("CHROME_PATH");

        Ok(Self {
            runner,
            artifact_bucket: lookup("ARTIFACT_BUCKET").filter(|b| !b.trim().is_empty()),
            artifact_prefix: lookup("ARTIFACT_PREFIX").unwrap_or_else(|| "reward-runner".to_string()),
            artifact_region: lookup("ARTIFACT_REGION")
                .unwrap_or_else(|| "ap-southeast-2".to_string()),
        })
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        self.runner.validate()?;

        if let Some(bucket) = &self.artifact_bucket {
            validate_bucket_name("artifact_bucket", bucket)?;
            validation::validate_non_empty_string("artifact_prefix", &self.artifact_prefix)?;
            validation::validate_non_empty_string("artifact_region", &self.artifact_region)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    use crate::utils::error::ClaimError;

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(ClaimError::InvalidConfigValue {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(ClaimError::InvalidConfigValue {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    Ok(())
}
