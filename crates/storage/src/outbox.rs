//! Recording mailer.
//!
//! Stands in for the transactional email provider: every message is kept in
//! send order and can be inspected afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mappin_core::traits::Mailer;
use mappin_core::MappinResult;
use parking_lot::Mutex;
use uuid::Uuid;

/// One delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    /// Provider id returned to the caller
    pub id: String,
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// When the message was accepted
    pub sent_at: DateTime<Utc>,
}

/// Mailer that records instead of delivering.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    from: String,
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl Outbox {
    /// Create an empty outbox without a sender address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty outbox sending as `from`.
    pub fn with_sender(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            sent: Arc::default(),
        }
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }

    /// The most recent message sent to `to`.
    pub fn last_to(&self, to: &str) -> Option<SentMail> {
        self.sent.lock().iter().rev().find(|m| m.to == to).cloned()
    }
}

impl Mailer for Outbox {
    fn send(&self, to: &str, subject: &str, body: &str) -> MappinResult<String> {
        let id = Uuid::new_v4().to_string();
        self.sent.lock().push(SentMail {
            id: id.clone(),
            from: self.from.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
        });
        tracing::debug!(to, subject, mail_id = %id, "mail queued");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_records_in_order() {
        let outbox = Outbox::with_sender("Mappin <noreply@example.com>");
        let first = outbox.send("a@example.com", "hi", "one").unwrap();
        outbox.send("b@example.com", "hi", "two").unwrap();
        outbox.send("a@example.com", "again", "three").unwrap();

        let sent = outbox.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].id, first);
        assert_eq!(sent[0].from, "Mappin <noreply@example.com>");
        assert_eq!(outbox.last_to("a@example.com").unwrap().body, "three");
        assert!(outbox.last_to("c@example.com").is_none());
    }
}
