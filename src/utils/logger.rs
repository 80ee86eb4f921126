use tracing::Span;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// headless_chrome logs every CDP message at debug
const VERBOSE_FILTER: &str = "reward_runner=debug,info,headless_chrome=warn";
const DEFAULT_FILTER: &str = "reward_runner=info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_cli_logger(verbose: bool) {
    let filter = env_filter(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(lambda_layer(std::io::stdout))
        .init();
}

/// One flat JSON object per event, carrying the `run` and `step` span fields
/// so CloudWatch queries can filter by mailbox address or failing stage.
fn lambda_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(true)
        .with_target(false)
        .without_time()
        .with_writer(writer)
}

/// Span covering one whole run. `email` is recorded once the mailbox exists.
pub fn run_span() -> Span {
    tracing::info_span!("run", email = tracing::field::Empty)
}

pub fn step_span(stage: &str, step: &str) -> Span {
    tracing::info_span!("step", stage = %stage, step = %step)
}
