use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One entry of a disposable inbox snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub subject: String,
    pub timestamp: Option<NaiveDateTime>,
}

impl MailMessage {
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            timestamp: None,
        }
    }
}

/// Outcome of one successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub email: String,
    pub code: String,
    pub rewards: String,
    pub steps_executed: usize,
    /// Where the diagnostic screenshots ended up.
    pub artifacts: Vec<String>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Body of the site's account registration call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub account: String,
    pub account_type: i32,
}

/// Body of the site's send-verification-code call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendCodePayload {
    pub account: String,
    pub account_type: i32,
    pub code_type: i32,
    pub support_captcha: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_code_payload_field_names() {
        let payload = SendCodePayload {
            account: "someone@example.com".to_string(),
            account_type: 1,
            code_type: 2,
            support_captcha: 0,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["account"], "someone@example.com");
        assert_eq!(value["account_type"], 1);
        assert_eq!(value["code_type"], 2);
        assert_eq!(value["support_captcha"], 0);
    }

    #[test]
    fn test_register_payload_parses_site_json() {
        let payload: RegisterPayload =
            serde_json::from_str(r#"{"account":"someone@example.com","account_type":1}"#).unwrap();
        assert_eq!(payload.account, "someone@example.com");
        assert_eq!(payload.account_type, 1);
    }

    #[test]
    fn test_response_status_parses() {
        let status: ResponseStatus = serde_json::from_str(r#"{"msg":"ok","ret":0}"#).unwrap();
        assert_eq!(status.msg, "ok");
    }

    #[test]
    fn test_run_report_serializes_duration_in_millis() {
        let report = RunReport {
            email: "a@b.c".to_string(),
            code: "ABCDE".to_string(),
            rewards: "Skin x1".to_string(),
            steps_executed: 30,
            artifacts: vec!["s3://bucket/reward-runner/foo.png".to_string()],
            duration: Duration::from_millis(1500),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["duration_ms"], 1500);
        assert_eq!(value["rewards"], "Skin x1");
        assert_eq!(value["artifacts"][0], "s3://bucket/reward-runner/foo.png");
        assert!(value.get("duration").is_none());
    }
}
