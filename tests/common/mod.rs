#![allow(dead_code)]

use async_trait::async_trait;
use reward_runner::core::{ArtifactStore, Clock, Mailbox, MailMessage, Page};
use reward_runner::{ClaimError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const ISSUER: &str = "LevelInfinitePass.account.levelinfinite.com";

/// Replays one scripted snapshot per fetch; the last one repeats.
pub struct ScriptedMailbox {
    address: String,
    snapshots: Vec<std::result::Result<Vec<MailMessage>, String>>,
    fetches: AtomicUsize,
}

impl ScriptedMailbox {
    pub fn new(snapshots: Vec<std::result::Result<Vec<MailMessage>, String>>) -> Self {
        Self {
            address: "runner@1secmail.com".to_string(),
            snapshots,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn always(inbox: Vec<MailMessage>) -> Self {
        Self::new(vec![Ok(inbox)])
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailbox for ScriptedMailbox {
    fn address(&self) -> &str {
        &self.address
    }

    async fn fetch_inbox(&self) -> Result<Vec<MailMessage>> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        let index = n.min(self.snapshots.len().saturating_sub(1));
        match self.snapshots.get(index) {
            Some(Ok(inbox)) => Ok(inbox.clone()),
            Some(Err(message)) => Err(ClaimError::Mailbox {
                message: message.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Returns immediately and remembers every requested sleep.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Logs every call as a short string and fails on request.
#[derive(Default)]
pub struct RecordingPage {
    pub calls: Mutex<Vec<String>>,
    pub fail_selector: Option<String>,
    pub fail_screenshot: bool,
    pub reward_text: String,
}

impl RecordingPage {
    pub fn with_rewards(text: &str) -> Self {
        Self {
            reward_text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, selector: &str) -> Self {
        self.fail_selector = Some(selector.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, selector: &str) -> Result<()> {
        if self.fail_selector.as_deref() == Some(selector) {
            return Err(ClaimError::Interaction {
                selector: selector.to_string(),
                message: "element not found".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Page for RecordingPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {}", url));
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.record(format!("click {}", selector));
        self.check(selector)
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.record(format!("fill {}={}", selector, text));
        self.check(selector)
    }

    async fn text_content(&self, selector: &str) -> Result<String> {
        self.record(format!("text {}", selector));
        self.check(selector)?;
        Ok(self.reward_text.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.record("screenshot".to_string());
        if self.fail_screenshot {
            return Err(ClaimError::Browser {
                message: "could not create screenshot".to_string(),
            });
        }
        Ok(b"\x89PNG".to_vec())
    }

    async fn wait(&self, duration: Duration) -> Result<()> {
        self.record(format!("wait {}ms", duration.as_millis()));
        Ok(())
    }

    async fn bring_to_front(&self) -> Result<()> {
        self.record("bring to front".to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub writes: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        self.writes.lock().unwrap().push((path.to_string(), data.len()));
        Ok(format!("memory://{}", path))
    }
}

pub fn issuer_mail(subject: &str) -> MailMessage {
    MailMessage::new(format!("noreply@{}", ISSUER), subject)
}
