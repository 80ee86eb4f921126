use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Environment setup failed: {message}")]
    EnvironmentSetup { message: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Element interaction failed on '{selector}': {message}")]
    Interaction { selector: String, message: String },

    #[error("Browser error: {message}")]
    Browser { message: String },

    #[error("Mailbox request failed: {message}")]
    Mailbox { message: String },

    #[error("Got invalid sender address, should not happen: {from}")]
    MalformedSender { from: String },

    #[error("Subject '{subject}' is shorter than the {expected}-character code")]
    CodeTooShort { subject: String, expected: usize },

    #[error("Timed out after {attempts} inbox polls")]
    PollTimeout { attempts: u32 },

    #[error("Step '{step}' in stage '{stage}' failed: {source}")]
    Step {
        stage: String,
        step: String,
        #[source]
        source: Box<ClaimError>,
    },

    #[error("Flow error: {message}")]
    Flow { message: String },

    #[error("Artifact storage error: {message}")]
    Storage { message: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Setup,
    Navigation,
    Interaction,
    Mailbox,
    Verification,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ClaimError {
    /// Wraps `self` with the label of the step that produced it.
    pub fn in_step(self, stage: &str, step: &str) -> Self {
        ClaimError::Step {
            stage: stage.to_string(),
            step: step.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping step labels.
    pub fn root(&self) -> &ClaimError {
        match self {
            ClaimError::Step { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            ClaimError::EnvironmentSetup { .. } | ClaimError::Browser { .. } => {
                ErrorCategory::Setup
            }
            ClaimError::Navigation { .. } => ErrorCategory::Navigation,
            ClaimError::Interaction { .. } | ClaimError::Flow { .. } => {
                ErrorCategory::Interaction
            }
            ClaimError::Mailbox { .. } | ClaimError::Http(_) => ErrorCategory::Mailbox,
            ClaimError::MalformedSender { .. }
            | ClaimError::CodeTooShort { .. }
            | ClaimError::PollTimeout { .. } => ErrorCategory::Verification,
            ClaimError::Config { .. } | ClaimError::InvalidConfigValue { .. } => {
                ErrorCategory::Config
            }
            ClaimError::Storage { .. } | ClaimError::Io(_) | ClaimError::Step { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the mailbox provider and the site are flaky, a later run may succeed
            ErrorCategory::Mailbox | ErrorCategory::Verification => ErrorSeverity::Medium,
            ErrorCategory::Navigation | ErrorCategory::Interaction => ErrorSeverity::High,
            ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Setup | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        let detail = match self {
            ClaimError::Step { stage, step, .. } => format!(" (stage '{}', step '{}')", stage, step),
            _ => String::new(),
        };
        let summary = match self.category() {
            ErrorCategory::Setup => "Could not start the headless browser",
            ErrorCategory::Navigation => "Could not open the landing page",
            ErrorCategory::Interaction => "A page element could not be used",
            ErrorCategory::Mailbox => "The disposable mailbox could not be reached",
            ErrorCategory::Verification => "No usable verification code was received",
            ErrorCategory::Config => "The configuration is invalid",
            ErrorCategory::System => "A local system error occurred",
        };
        format!("{}{}: {}", summary, detail, self.root())
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Setup => "Install Chrome/Chromium or point CHROME_PATH at the executable",
            ErrorCategory::Navigation => "Check network access to the landing page",
            ErrorCategory::Interaction => "The page layout may have changed, review the step selectors",
            ErrorCategory::Mailbox => "Check that the mailbox API base URL is reachable",
            ErrorCategory::Verification => "Run again, the verification mail may arrive late",
            ErrorCategory::Config => "Fix the reported configuration field",
            ErrorCategory::System => "Check file permissions and disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClaimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_label_keeps_root_category() {
        let err = ClaimError::PollTimeout { attempts: 10 }.in_step("await code", "poll inbox");
        assert_eq!(err.category(), ErrorCategory::Verification);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(matches!(err.root(), ClaimError::PollTimeout { attempts: 10 }));
        assert!(err.to_string().contains("await code"));
        assert!(err.to_string().contains("poll inbox"));
    }

    #[test]
    fn test_user_friendly_message_names_step() {
        let err = ClaimError::Interaction {
            selector: "#task_5".to_string(),
            message: "not found".to_string(),
        }
        .in_step("extra draws", "click task 5");

        let msg = err.user_friendly_message();
        assert!(msg.contains("extra draws"));
        assert!(msg.contains("click task 5"));
        assert!(msg.contains("#task_5"));
    }

    #[test]
    fn test_setup_errors_are_critical() {
        let err = ClaimError::EnvironmentSetup {
            message: "no chrome".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("CHROME_PATH"));
    }
}
