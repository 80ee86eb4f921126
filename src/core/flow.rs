use crate::config::RunnerConfig;
use crate::core::verification::CodePoller;
use crate::domain::ports::{ArtifactStore, Mailbox, Page};
use crate::utils::error::{ClaimError, Result};
use crate::utils::logger;
use std::fmt;
use std::time::Duration;
use tracing::Instrument;

pub const STAGE_OPEN: &str = "open";
pub const STAGE_SEND_CODE: &str = "send code";
pub const STAGE_AWAIT_CODE: &str = "await code";
pub const STAGE_REGISTER: &str = "register";
pub const STAGE_EXTRA_DRAWS: &str = "extra draws";
pub const STAGE_DRAW_REWARDS: &str = "draw rewards";
pub const STAGE_LIST_REWARDS: &str = "list rewards";

pub const REWARD_LIST_SELECTOR: &str = "#showRewardList";

/// Values only known once the run is under way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Email,
    VerificationCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Click(String),
    Fill { selector: String, input: Input },
    Wait(Duration),
    BringToFront,
    Screenshot(String),
    AwaitCode,
    ReadText(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Goto(url) => write!(f, "goto {}", url),
            Action::Click(selector) => write!(f, "click {}", selector),
            Action::Fill { selector, input } => write!(f, "fill {} with {:?}", selector, input),
            Action::Wait(d) => write!(f, "wait {:?}", d),
            Action::BringToFront => write!(f, "bring to front"),
            Action::Screenshot(path) => write!(f, "screenshot {}", path),
            Action::AwaitCode => write!(f, "await verification code"),
            Action::ReadText(selector) => write!(f, "read text {}", selector),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub stage: &'static str,
    pub name: String,
    pub action: Action,
    /// A failing optional step is logged and skipped.
    pub optional: bool,
}

impl Step {
    fn new(stage: &'static str, name: impl Into<String>, action: Action) -> Self {
        Self {
            stage,
            name: name.into(),
            action,
            optional: false,
        }
    }

    fn click(stage: &'static str, name: impl Into<String>, selector: &str) -> Self {
        Self::new(stage, name, Action::Click(selector.to_string()))
    }

    fn best_effort(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// The whole claim flow, in execution order.
pub fn claim_steps(config: &RunnerConfig) -> Vec<Step> {
    let mut steps = vec![
        Step::new(STAGE_OPEN, "goto landing page", Action::Goto(config.page_url.clone())),
        // the cookie banner blocks the register button when it shows up
        Step::click(STAGE_OPEN, "reject cookies", "#onetrust-reject-all-handler").best_effort(),
        Step::click(STAGE_SEND_CODE, "start register", "#beginLogin"),
        Step::click(STAGE_SEND_CODE, "go to register", ".login-goRegister__button"),
        Step::new(
            STAGE_SEND_CODE,
            "fill email",
            Action::Fill {
                selector: "#registerForm_account".to_string(),
                input: Input::Email,
            },
        ),
        Step::click(STAGE_SEND_CODE, "send code", "._1egsyt72"),
        Step::new(STAGE_AWAIT_CODE, "poll inbox", Action::AwaitCode),
        Step::new(
            STAGE_REGISTER,
            "fill in code",
            Action::Fill {
                selector: "._1egsyt71 .infinite-input".to_string(),
                input: Input::VerificationCode,
            },
        ),
        Step::click(STAGE_REGISTER, "check confirmation", "._1462jlh1 .infinite-checkbox-input"),
        Step::new(
            STAGE_REGISTER,
            "screenshot",
            Action::Screenshot(config.screenshot_path.clone()),
        ),
        Step::click(STAGE_REGISTER, "confirm register", "._1aucblfa .infinite-btn"),
        Step::click(STAGE_REGISTER, "close modal after register", "#dlg_beta_signup .dg_box_close"),
    ];

    for task in 2..5 {
        steps.push(Step::click(
            STAGE_EXTRA_DRAWS,
            format!("click task {}", task),
            &format!("#task_{}", task),
        ));
    }
    steps.push(Step::new(
        STAGE_EXTRA_DRAWS,
        "wait for tasks",
        Action::Wait(Duration::from_secs(1)),
    ));
    // the share task opens a new tab
    steps.push(Step::new(STAGE_EXTRA_DRAWS, "bring page to front", Action::BringToFront));
    steps.push(Step::click(STAGE_EXTRA_DRAWS, "click task 5", "#task_5"));
    steps.push(Step::click(
        STAGE_EXTRA_DRAWS,
        "close share link",
        "#dlg_share_link .dg_box_close",
    ));

    steps.push(Step::click(
        STAGE_DRAW_REWARDS,
        "open draw modal",
        ".draw_reward .reward_list_awaits_btn",
    ));
    for round in 1..=5 {
        steps.push(Step::click(
            STAGE_DRAW_REWARDS,
            format!("draw reward {}", round),
            "#draw_now",
        ));
        steps.push(Step::click(
            STAGE_DRAW_REWARDS,
            format!("back to draw {}", round),
            "#back_to_draw",
        ));
    }
    steps.push(Step::click(
        STAGE_DRAW_REWARDS,
        "close draw modal",
        ".dlg_draw_now .dg_box_close",
    ));

    steps.push(Step::click(
        STAGE_LIST_REWARDS,
        "open reward list",
        ".draw_reward .awaits_btn.draw_awaits_btn",
    ));
    steps.push(Step::new(
        STAGE_LIST_REWARDS,
        "read reward list",
        Action::ReadText(REWARD_LIST_SELECTOR.to_string()),
    ));

    steps
}

/// State threaded through the step list.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub email: String,
    pub code: Option<String>,
    pub text: Option<String>,
    pub steps_executed: usize,
    pub artifacts: Vec<String>,
}

impl RunContext {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    fn input(&self, input: Input) -> Result<&str> {
        match input {
            Input::Email => Ok(&self.email),
            Input::VerificationCode => self.code.as_deref().ok_or_else(|| ClaimError::Flow {
                message: "verification code requested before it was received".to_string(),
            }),
        }
    }
}

/// Runs steps in order against one page and one mailbox, stopping at the
/// first required step that fails.
pub struct FlowDriver<'a> {
    page: &'a dyn Page,
    mailbox: &'a dyn Mailbox,
    poller: &'a CodePoller,
    store: &'a dyn ArtifactStore,
}

impl<'a> FlowDriver<'a> {
    pub fn new(
        page: &'a dyn Page,
        mailbox: &'a dyn Mailbox,
        poller: &'a CodePoller,
        store: &'a dyn ArtifactStore,
    ) -> Self {
        Self {
            page,
            mailbox,
            poller,
            store,
        }
    }

    pub async fn run(&self, steps: &[Step], context: &mut RunContext) -> Result<()> {
        let mut current_stage = "";

        for step in steps {
            if step.stage != current_stage {
                tracing::info!("▶️ {}...", step.stage);
                current_stage = step.stage;
            }
            tracing::debug!("step '{}': {}", step.name, step.action);

            let outcome = self
                .execute(&step.action, context)
                .instrument(logger::step_span(step.stage, &step.name))
                .await;

            match outcome {
                Ok(()) => context.steps_executed += 1,
                Err(e) if step.optional => {
                    tracing::warn!("⏭️ Skipping optional step '{}': {}", step.name, e);
                }
                Err(e) => {
                    tracing::error!("❌ Step '{}' in stage '{}' failed: {}", step.name, step.stage, e);
                    return Err(e.in_step(step.stage, &step.name));
                }
            }
        }

        Ok(())
    }

    async fn execute(&self, action: &Action, context: &mut RunContext) -> Result<()> {
        match action {
            Action::Goto(url) => self.page.goto(url).await,
            Action::Click(selector) => self.page.click(selector).await,
            Action::Fill { selector, input } => {
                let value = context.input(*input)?;
                self.page.fill(selector, value).await
            }
            Action::Wait(duration) => self.page.wait(*duration).await,
            Action::BringToFront => self.page.bring_to_front().await,
            Action::Screenshot(path) => {
                let png = self.page.screenshot().await?;
                let location = self.store.write_file(path, &png).await?;
                tracing::info!("📸 screenshot saved to {}", location);
                context.artifacts.push(location);
                Ok(())
            }
            Action::AwaitCode => {
                let code = self.poller.wait_for_code(self.mailbox).await?;
                tracing::info!("🔑 got verification code: {}", code);
                context.code = Some(code);
                Ok(())
            }
            Action::ReadText(selector) => {
                context.text = Some(self.page.text_content(selector).await?);
                Ok(())
            }
        }
    }
}
