mod common;

use common::{issuer_mail, RecordingClock, ScriptedMailbox, ISSUER};
use reward_runner::core::verification::{CodePoller, PollPolicy};
use reward_runner::core::MailMessage;
use reward_runner::ClaimError;
use std::sync::Arc;
use std::time::Duration;

fn poller(clock: Arc<RecordingClock>) -> CodePoller {
    CodePoller::new(
        PollPolicy {
            interval: Duration::from_secs(5),
            max_attempts: 10,
            code_length: 5,
            issuer_domain: ISSUER.to_string(),
        },
        clock,
    )
}

#[tokio::test]
async fn test_matching_mail_found_on_first_poll() {
    let clock = Arc::new(RecordingClock::default());
    let mailbox = ScriptedMailbox::always(vec![MailMessage::new(
        format!("x@{}", ISSUER),
        "ABCDEdontcare",
    )]);

    let code = poller(clock.clone()).wait_for_code(&mailbox).await.unwrap();

    assert_eq!(code, "ABCDE");
    assert_eq!(mailbox.fetches(), 1);
    // ticker semantics: one interval passes before the first fetch
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
}

#[tokio::test]
async fn test_times_out_after_exactly_ten_attempts() {
    let clock = Arc::new(RecordingClock::default());
    let mailbox = ScriptedMailbox::always(vec![
        MailMessage::new("news@example.com", "12345 newsletter"),
        MailMessage::new("support@other.example", "67890 hello"),
    ]);

    let err = poller(clock.clone()).wait_for_code(&mailbox).await.unwrap_err();

    assert!(matches!(err, ClaimError::PollTimeout { attempts: 10 }));
    assert_eq!(mailbox.fetches(), 10);
    assert_eq!(clock.sleeps().len(), 10);
}

#[tokio::test]
async fn test_mail_arriving_late_is_picked_up() {
    let clock = Arc::new(RecordingClock::default());
    let mailbox = ScriptedMailbox::new(vec![
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec![issuer_mail("24680 is your verification code")]),
    ]);

    let code = poller(clock).wait_for_code(&mailbox).await.unwrap();

    assert_eq!(code, "24680");
    assert_eq!(mailbox.fetches(), 3);
}

#[tokio::test]
async fn test_malformed_sender_fails_immediately() {
    for from in ["no-at-sign", "a@b@c.example"] {
        let clock = Arc::new(RecordingClock::default());
        let mailbox = ScriptedMailbox::always(vec![
            MailMessage::new(from, "whatever"),
            issuer_mail("ABCDE"),
        ]);

        let err = poller(clock).wait_for_code(&mailbox).await.unwrap_err();

        assert!(
            matches!(err, ClaimError::MalformedSender { from: ref f } if f == from),
            "unexpected error for {}: {:?}",
            from,
            err
        );
        assert_eq!(mailbox.fetches(), 1);
    }
}

#[tokio::test]
async fn test_first_match_in_fetch_order_wins() {
    let clock = Arc::new(RecordingClock::default());
    let mailbox = ScriptedMailbox::always(vec![
        MailMessage::new("other@example.com", "00000"),
        issuer_mail("11111 first"),
        issuer_mail("22222 second"),
    ]);

    let code = poller(clock).wait_for_code(&mailbox).await.unwrap();

    assert_eq!(code, "11111");
}

#[tokio::test]
async fn test_fetch_error_aborts_without_retry() {
    let clock = Arc::new(RecordingClock::default());
    let mailbox = ScriptedMailbox::new(vec![
        Ok(vec![]),
        Err("connection reset".to_string()),
        Ok(vec![issuer_mail("ABCDE")]),
    ]);

    let err = poller(clock).wait_for_code(&mailbox).await.unwrap_err();

    assert!(matches!(err, ClaimError::Mailbox { .. }));
    assert_eq!(mailbox.fetches(), 2);
}

#[tokio::test]
async fn test_short_subject_is_an_error() {
    let clock = Arc::new(RecordingClock::default());
    let mailbox = ScriptedMailbox::always(vec![issuer_mail("123")]);

    let err = poller(clock).wait_for_code(&mailbox).await.unwrap_err();

    assert!(matches!(err, ClaimError::CodeTooShort { expected: 5, .. }));
}
