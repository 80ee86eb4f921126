#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use reward_runner::adapters::S3Store;
#[cfg(feature = "lambda")]
use reward_runner::core::ArtifactStore;
#[cfg(feature = "lambda")]
use reward_runner::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use reward_runner::{ChromeLauncher, ClaimEngine, LambdaConfig, LocalStore, OneSecMailClient};

#[cfg(feature = "lambda")]
async fn run_with_store<S: ArtifactStore>(config: &LambdaConfig, store: S) -> Result<String, Error> {
    let mail = OneSecMailClient::new(config.runner.mail_api_base.clone())?;
    let browser = ChromeLauncher::new(&config.runner);
    let engine = ClaimEngine::new(mail, browser, store, config.runner.clone());

    let report = engine.run().await.map_err(|e| {
        tracing::error!(
            category = ?e.category(),
            severity = ?e.severity(),
            "❌ Run failed: {}",
            e
        );
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    tracing::info!(
        email = %report.email,
        steps = report.steps_executed,
        artifacts = ?report.artifacts,
        duration_ms = report.duration.as_millis() as u64,
        "Run completed"
    );
    Ok(report.rewards)
}

/// The event payload carries nothing; every setting comes from the environment.
#[cfg(feature = "lambda")]
async fn function_handler(_event: LambdaEvent<serde_json::Value>) -> Result<String, Error> {
    tracing::info!("Starting reward run Lambda function");

    let config = LambdaConfig::from_env()?;
    config.validate()?;

    match &config.artifact_bucket {
        Some(bucket) => {
            let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
                .region(Region::new(config.artifact_region.clone()))
                .build();
            let store = S3Store::new(
                S3Client::from_conf(s3_config),
                bucket.clone(),
                config.artifact_prefix.clone(),
            );
            run_with_store(&config, store).await
        }
        // only /tmp is writable inside Lambda
        None => run_with_store(&config, LocalStore::new("/tmp")).await,
    }
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
