use crate::domain::model::MailMessage;
use crate::domain::ports::{Mailbox, MailboxProvider};
use crate::utils::error::{ClaimError, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::time::Duration;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client for the 1secmail disposable mailbox API.
#[derive(Debug, Clone)]
pub struct OneSecMailClient {
    http: reqwest::Client,
    api_base: String,
}

impl OneSecMailClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }
}

#[async_trait]
impl MailboxProvider for OneSecMailClient {
    type Mailbox = OneSecMailbox;

    async fn new_mailbox(&self) -> Result<OneSecMailbox> {
        let addresses: Vec<String> = self
            .http
            .get(&self.api_base)
            .query(&[("action", "genRandomMailbox"), ("count", "1")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| mailbox_error("failed to create mailbox", e))?
            .json()
            .await
            .map_err(|e| mailbox_error("failed to decode new mailbox", e))?;

        let address = addresses.into_iter().next().ok_or_else(|| ClaimError::Mailbox {
            message: "provider returned no address".to_string(),
        })?;

        let (login, domain) = match address.split_once('@') {
            Some((login, domain)) if !login.is_empty() && !domain.is_empty() => {
                (login.to_string(), domain.to_string())
            }
            _ => {
                return Err(ClaimError::Mailbox {
                    message: format!("provider returned an invalid address: {}", address),
                })
            }
        };

        Ok(OneSecMailbox {
            http: self.http.clone(),
            api_base: self.api_base.clone(),
            address,
            login,
            domain,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OneSecMailbox {
    http: reqwest::Client,
    api_base: String,
    address: String,
    login: String,
    domain: String,
}

#[derive(Debug, Deserialize)]
struct InboxEntry {
    #[allow(dead_code)]
    id: i64,
    from: String,
    subject: String,
    date: String,
}

impl From<InboxEntry> for MailMessage {
    fn from(entry: InboxEntry) -> Self {
        Self {
            timestamp: NaiveDateTime::parse_from_str(&entry.date, DATE_FORMAT).ok(),
            from: entry.from,
            subject: entry.subject,
        }
    }
}

#[async_trait]
impl Mailbox for OneSecMailbox {
    fn address(&self) -> &str {
        &self.address
    }

    async fn fetch_inbox(&self) -> Result<Vec<MailMessage>> {
        let entries: Vec<InboxEntry> = self
            .http
            .get(&self.api_base)
            .query(&[
                ("action", "getMessages"),
                ("login", self.login.as_str()),
                ("domain", self.domain.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| mailbox_error("failed to get latest message", e))?
            .json()
            .await
            .map_err(|e| mailbox_error("failed to decode inbox", e))?;

        Ok(entries.into_iter().map(MailMessage::from).collect())
    }
}

fn mailbox_error(context: &str, err: reqwest::Error) -> ClaimError {
    ClaimError::Mailbox {
        message: format!("{}: {}", context, err),
    }
}
