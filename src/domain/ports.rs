use crate::domain::model::MailMessage;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A provisioned disposable address and its inbox.
#[async_trait]
pub trait Mailbox: Send + Sync {
    fn address(&self) -> &str;

    /// Full inbox snapshot, in provider order.
    async fn fetch_inbox(&self) -> Result<Vec<MailMessage>>;
}

#[async_trait]
pub trait MailboxProvider: Send + Sync {
    type Mailbox: Mailbox;

    async fn new_mailbox(&self) -> Result<Self::Mailbox>;
}

/// The single live tab a run drives.
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;
    async fn click(&self, selector: &str) -> Result<()>;
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;
    async fn text_content(&self, selector: &str) -> Result<String>;
    /// PNG bytes of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>>;
    async fn wait(&self, duration: Duration) -> Result<()>;
    async fn bring_to_front(&self) -> Result<()>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Page: Page;

    /// Resolves the browser executable without starting it.
    fn prepare(&self) -> Result<()>;

    async fn launch(&self) -> Result<Self::Page>;
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Returns where the artifact ended up.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String>;
}

#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
