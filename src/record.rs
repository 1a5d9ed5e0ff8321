//! The email record and the request that creates one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A request to send an email and record it.
///
/// Carries no id and no timestamp: both are assigned by the pipeline and
/// the store, never by the caller.
///
/// ```
/// use mailrecord::NewEmail;
///
/// let email = NewEmail::new("a@example.com", "Hi", "<p>Body</p>");
/// assert!(email.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmail {
    /// Recipient address
    #[serde(default)]
    pub to: String,
    /// Subject line, may be empty
    #[serde(default)]
    pub subject: String,
    /// Body content, may be empty
    #[serde(default)]
    pub message: String,
}

impl NewEmail {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Reject requests with no recipient.
    ///
    /// Address syntax is left to the transport.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.to.trim().is_empty() {
            return Err(ValidationError::MissingField("to"));
        }
        Ok(())
    }
}

/// The durable entry describing one dispatched email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Store-assigned identifier; `None` until inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub to: String,
    pub subject: String,
    pub message: String,
    /// When persistence was attempted.
    pub created: DateTime<Utc>,
}

impl EmailRecord {
    /// Build an unsaved record stamped with `created`.
    pub fn unsaved(email: NewEmail, created: DateTime<Utc>) -> Self {
        Self {
            id: None,
            to: email.to,
            subject: email.subject,
            message: email.message,
            created,
        }
    }

    /// Attach the id the store assigned.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether the record has been persisted.
    pub fn is_saved(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_recipient() {
        assert_eq!(
            NewEmail::new("   ", "Hi", "Body").validate(),
            Err(ValidationError::MissingField("to"))
        );
        assert!(NewEmail::new("a@x.com", "", "").validate().is_ok());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let email: NewEmail = serde_json::from_str(r#"{"to":"a@x.com"}"#).unwrap();
        assert_eq!(email.subject, "");
        assert_eq!(email.message, "");
    }

    #[test]
    fn test_unsaved_record_omits_id() {
        let record = EmailRecord::unsaved(NewEmail::new("a@x.com", "Hi", "Body"), Utc::now());
        assert!(!record.is_saved());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["to"], "a@x.com");
    }

    #[test]
    fn test_saved_record_serializes_id_and_timestamp() {
        let created = "2024-05-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let record = EmailRecord::unsaved(NewEmail::new("a@x.com", "Hi", "Body"), created)
            .with_id("abc");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["created"], "2024-05-01T12:30:00Z");
    }
}
