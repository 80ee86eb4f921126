use crate::config::RunnerConfig;
use crate::domain::model::MailMessage;
use crate::domain::ports::{Clock, Mailbox};
use crate::utils::error::{ClaimError, Result};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    pub code_length: usize,
    pub issuer_domain: String,
}

impl From<&RunnerConfig> for PollPolicy {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.max_attempts,
            code_length: config.code_length,
            issuer_domain: config.issuer_domain.clone(),
        }
    }
}

/// Waits for the issuer's mail and reads the code off its subject line.
pub struct CodePoller {
    policy: PollPolicy,
    clock: Arc<dyn Clock>,
}

impl CodePoller {
    pub fn new(policy: PollPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { policy, clock }
    }

    /// Every attempt sleeps one interval, then re-scans the whole inbox.
    /// Fetch errors and malformed senders end the wait immediately.
    pub async fn wait_for_code(&self, mailbox: &dyn Mailbox) -> Result<String> {
        for attempt in 1..=self.policy.max_attempts {
            self.clock.sleep(self.policy.interval).await;

            let inbox = mailbox.fetch_inbox().await?;
            tracing::info!(
                "📬 refreshing inbox found {} emails (attempt {}/{})",
                inbox.len(),
                attempt,
                self.policy.max_attempts
            );

            if let Some(code) =
                scan_inbox(&inbox, &self.policy.issuer_domain, self.policy.code_length)?
            {
                return Ok(code);
            }
        }

        Err(ClaimError::PollTimeout {
            attempts: self.policy.max_attempts,
        })
    }
}

/// First message from `issuer_domain` in snapshot order wins.
pub fn scan_inbox(
    inbox: &[MailMessage],
    issuer_domain: &str,
    code_length: usize,
) -> Result<Option<String>> {
    for message in inbox {
        let parts: Vec<&str> = message.from.split('@').collect();
        if parts.len() != 2 {
            return Err(ClaimError::MalformedSender {
                from: message.from.clone(),
            });
        }

        if parts[1] == issuer_domain {
            return extract_code(&message.subject, code_length).map(Some);
        }
    }

    Ok(None)
}

/// Leading `length` characters of the subject. Shorter subjects are an error.
pub fn extract_code(subject: &str, length: usize) -> Result<String> {
    let code: String = subject.chars().take(length).collect();
    if code.chars().count() < length {
        return Err(ClaimError::CodeTooShort {
            subject: subject.to_string(),
            expected: length,
        });
    }
    Ok(code)
}
