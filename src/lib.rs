pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LambdaConfig, RunnerConfig};

pub use adapters::{ChromeLauncher, LocalStore, OneSecMailClient};
pub use core::engine::ClaimEngine;
pub use domain::model::RunReport;
pub use utils::error::{ClaimError, Result};
