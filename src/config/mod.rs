#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod runner;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use lambda::LambdaConfig;
pub use runner::RunnerConfig;
