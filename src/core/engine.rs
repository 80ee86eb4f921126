use crate::config::RunnerConfig;
use crate::core::flow::{self, FlowDriver, RunContext};
use crate::core::verification::{CodePoller, PollPolicy};
use crate::domain::model::RunReport;
use crate::domain::ports::{ArtifactStore, BrowserLauncher, Clock, Mailbox, MailboxProvider, TokioClock};
use crate::utils::error::{ClaimError, Result};
use crate::utils::logger;
use crate::utils::monitor::RunMonitor;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Span};

pub struct ClaimEngine<M, B, S>
where
    M: MailboxProvider,
    B: BrowserLauncher,
    S: ArtifactStore,
{
    mail: M,
    browser: B,
    store: S,
    clock: Arc<dyn Clock>,
    config: RunnerConfig,
    monitor: RunMonitor,
}

impl<M, B, S> ClaimEngine<M, B, S>
where
    M: MailboxProvider,
    B: BrowserLauncher,
    S: ArtifactStore,
{
    pub fn new(mail: M, browser: B, store: S, config: RunnerConfig) -> Self {
        Self {
            mail,
            browser,
            store,
            clock: Arc::new(TokioClock),
            config,
            monitor: RunMonitor::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = RunMonitor::new(enabled);
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        let span = logger::run_span();
        self.claim(&span).instrument(span.clone()).await
    }

    async fn claim(&self, span: &Span) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("🚀 Starting reward run");

        self.browser
            .prepare()
            .map_err(|e| e.in_step("setup", "prepare browser"))?;

        let mailbox = self
            .mail
            .new_mailbox()
            .await
            .map_err(|e| e.in_step("setup", "create mailbox"))?;
        span.record("email", mailbox.address());
        tracing::info!("📧 got email: {}", mailbox.address());

        let page = self
            .browser
            .launch()
            .await
            .map_err(|e| e.in_step("setup", "launch browser"))?;
        self.monitor.log_stats("Browser launched");

        let poller = CodePoller::new(PollPolicy::from(&self.config), self.clock.clone());
        let steps = flow::claim_steps(&self.config);
        let mut context = RunContext::new(mailbox.address());

        FlowDriver::new(&page, &mailbox, &poller, &self.store)
            .run(&steps, &mut context)
            .await?;
        self.monitor.log_stats("Flow finished");

        let rewards = context.text.take().ok_or_else(|| ClaimError::Flow {
            message: "flow finished without reading the reward list".to_string(),
        })?;
        let code = context.code.take().unwrap_or_default();

        let report = RunReport {
            email: context.email,
            code,
            rewards,
            steps_executed: context.steps_executed,
            artifacts: context.artifacts,
            duration: started.elapsed(),
        };

        tracing::info!(
            artifacts = ?report.artifacts,
            "✅ Run finished in {:?} ({} steps): {}",
            report.duration,
            report.steps_executed,
            report.rewards
        );
        Ok(report)
    }
}
