pub mod engine;
pub mod flow;
pub mod verification;

pub use crate::domain::model::{MailMessage, RunReport};
pub use crate::domain::ports::{ArtifactStore, BrowserLauncher, Clock, Mailbox, MailboxProvider, Page};
pub use crate::utils::error::Result;
