use clap::Parser;
use reward_runner::utils::error::ErrorSeverity;
use reward_runner::utils::{logger, validation::Validate};
use reward_runner::{ChromeLauncher, ClaimEngine, CliConfig, LocalStore, OneSecMailClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting reward-runner CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.validate().and_then(|_| cli.runner_config()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if cli.monitor {
        tracing::info!("🔍 Run monitoring enabled");
    }

    let mail = OneSecMailClient::new(config.mail_api_base.clone())?;
    let browser = ChromeLauncher::new(&config);
    let store = LocalStore::new(cli.output_dir.clone());

    let engine = ClaimEngine::new(mail, browser, store, config).with_monitoring(cli.monitor);

    match engine.run().await {
        Ok(report) => {
            println!("{}", report.rewards);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2, // worth retrying
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
