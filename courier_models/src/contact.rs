use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    email_address::EmailAddress,
    macros::{id, nutype_string},
};

id!(ContactMessageId);

nutype_string!(ContactName(
    sanitize(trim),
    validate(not_empty, len_char_max = 256)
));

nutype_string!(ContactSubject(
    sanitize(trim),
    validate(not_empty, len_char_max = 256)
));

nutype_string!(ContactMessageContent(
    sanitize(trim),
    validate(not_empty, len_char_max = 4096)
));

impl ContactName {
    pub const MAX_LEN: usize = 256;
}

impl ContactSubject {
    pub const MAX_LEN: usize = 256;
}

impl ContactMessageContent {
    pub const MAX_LEN: usize = 4096;
}

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NULL_MESSAGE: &str = "This field may not be null.";
pub const NOT_A_STRING_MESSAGE: &str = "Not a valid string.";
pub const BLANK_MESSAGE: &str = "This field may not be blank.";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";

pub fn max_len_message(max_len: usize) -> String {
    format!("Ensure this field has no more than {max_len} characters.")
}

/// Untrusted contact form input as received from a client. A field is `None`
/// if the client did not send it at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: Option<ContactFieldValue>,
    pub email: Option<ContactFieldValue>,
    pub subject: Option<ContactFieldValue>,
    pub message: Option<ContactFieldValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactFieldValue {
    Text(String),
    Null,
    /// A list, an object or a boolean.
    NotAString,
}

impl From<String> for ContactFieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ContactFieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: ContactName,
    pub email: EmailAddress,
    pub subject: ContactSubject,
    pub message: ContactMessageContent,
}

/// A contact message as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageRecord {
    pub id: ContactMessageId,
    pub message: ContactMessage,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

/// Error messages of a rejected submission, grouped by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContactValidationErrors(BTreeMap<ContactField, Vec<String>>);

impl ContactValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: ContactField) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = ContactField> + '_ {
        self.0.keys().copied()
    }

    pub fn add(&mut self, field: ContactField, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    fn check<T>(
        &mut self,
        field: ContactField,
        value: Option<ContactFieldValue>,
        validate: impl FnOnce(String) -> Result<T, String>,
    ) -> Option<T> {
        let message = match value {
            Some(ContactFieldValue::Text(value)) => {
                return validate(value).map_err(|err| self.add(field, err)).ok();
            }
            Some(ContactFieldValue::Null) => NULL_MESSAGE,
            Some(ContactFieldValue::NotAString) => NOT_A_STRING_MESSAGE,
            None => REQUIRED_MESSAGE,
        };
        self.add(field, message);
        None
    }
}

impl TryFrom<ContactSubmission> for ContactMessage {
    type Error = ContactValidationErrors;

    fn try_from(submission: ContactSubmission) -> Result<Self, Self::Error> {
        let mut errors = ContactValidationErrors::default();

        let name = errors.check(ContactField::Name, submission.name, |name| {
            ContactName::try_new(name).map_err(|err| match err {
                ContactNameError::NotEmptyViolated => BLANK_MESSAGE.into(),
                ContactNameError::LenCharMaxViolated => max_len_message(ContactName::MAX_LEN),
            })
        });

        let email = errors.check(ContactField::Email, submission.email, parse_email);

        let subject = errors.check(ContactField::Subject, submission.subject, |subject| {
            ContactSubject::try_new(subject).map_err(|err| match err {
                ContactSubjectError::NotEmptyViolated => BLANK_MESSAGE.into(),
                ContactSubjectError::LenCharMaxViolated => {
                    max_len_message(ContactSubject::MAX_LEN)
                }
            })
        });

        let message = errors.check(ContactField::Message, submission.message, |message| {
            ContactMessageContent::try_new(message).map_err(|err| match err {
                ContactMessageContentError::NotEmptyViolated => BLANK_MESSAGE.into(),
                ContactMessageContentError::LenCharMaxViolated => {
                    max_len_message(ContactMessageContent::MAX_LEN)
                }
            })
        });

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) if errors.is_empty() => {
                Ok(Self {
                    name,
                    email,
                    subject,
                    message,
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_email(email: String) -> Result<EmailAddress, String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(BLANK_MESSAGE.into());
    }
    if email.chars().count() > EmailAddress::MAX_LEN {
        return Err(max_len_message(EmailAddress::MAX_LEN));
    }
    email.parse().map_err(|_| INVALID_EMAIL_MESSAGE.into())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: Some("Alice".into()),
            email: Some("alice@example.com".into()),
            subject: Some("Hi".into()),
            message: Some("Hello there".into()),
        }
    }

    #[test]
    fn valid() {
        let message = ContactMessage::try_from(submission()).unwrap();

        assert_eq!(*message.name, "Alice");
        assert_eq!(message.email.as_str(), "alice@example.com");
        assert_eq!(*message.subject, "Hi");
        assert_eq!(*message.message, "Hello there");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let message = ContactMessage::try_from(ContactSubmission {
            name: Some("  Alice ".into()),
            email: Some(" alice@example.com\n".into()),
            subject: Some("\tHi".into()),
            message: Some("Hello there\n\n".into()),
        })
        .unwrap();

        assert_eq!(*message.name, "Alice");
        assert_eq!(message.email.as_str(), "alice@example.com");
        assert_eq!(*message.subject, "Hi");
        assert_eq!(*message.message, "Hello there");
    }

    #[test]
    fn missing_fields() {
        let errors = ContactMessage::try_from(ContactSubmission::default()).unwrap_err();

        for field in [
            ContactField::Name,
            ContactField::Email,
            ContactField::Subject,
            ContactField::Message,
        ] {
            assert_eq!(errors.get(field).unwrap(), [REQUIRED_MESSAGE]);
        }
    }

    #[test]
    fn blank_fields() {
        for (field, blank) in [
            (
                ContactField::Name,
                ContactSubmission {
                    name: Some("".into()),
                    ..submission()
                },
            ),
            (
                ContactField::Email,
                ContactSubmission {
                    email: Some("   ".into()),
                    ..submission()
                },
            ),
            (
                ContactField::Subject,
                ContactSubmission {
                    subject: Some(" \t ".into()),
                    ..submission()
                },
            ),
            (
                ContactField::Message,
                ContactSubmission {
                    message: Some("".into()),
                    ..submission()
                },
            ),
        ] {
            let errors = ContactMessage::try_from(blank).unwrap_err();
            assert_eq!(errors.fields().collect::<Vec<_>>(), [field]);
            assert_eq!(errors.get(field).unwrap(), [BLANK_MESSAGE]);
        }
    }

    #[test]
    fn invalid_email() {
        for email in ["not-an-email", "alice@", "@example.com", "alice example.com"] {
            let errors = ContactMessage::try_from(ContactSubmission {
                email: Some(email.into()),
                ..submission()
            })
            .unwrap_err();

            assert_eq!(errors.fields().collect::<Vec<_>>(), [ContactField::Email]);
            assert_eq!(
                errors.get(ContactField::Email).unwrap(),
                [INVALID_EMAIL_MESSAGE]
            );
        }
    }

    #[test]
    fn too_long() {
        let errors = ContactMessage::try_from(ContactSubmission {
            name: Some("a".repeat(ContactName::MAX_LEN + 1).into()),
            email: Some(format!("{}@example.com", "a".repeat(EmailAddress::MAX_LEN)).into()),
            subject: Some("a".repeat(ContactSubject::MAX_LEN).into()),
            message: Some("a".repeat(ContactMessageContent::MAX_LEN + 1).into()),
        })
        .unwrap_err();

        assert_eq!(
            errors.get(ContactField::Name).unwrap(),
            [max_len_message(256)]
        );
        assert_eq!(
            errors.get(ContactField::Email).unwrap(),
            [max_len_message(254)]
        );
        assert_eq!(errors.get(ContactField::Subject), None);
        assert_eq!(
            errors.get(ContactField::Message).unwrap(),
            [max_len_message(4096)]
        );
    }

    #[test]
    fn null_and_non_string_fields() {
        let errors = ContactMessage::try_from(ContactSubmission {
            name: Some(ContactFieldValue::Null),
            subject: Some(ContactFieldValue::NotAString),
            ..submission()
        })
        .unwrap_err();

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            [ContactField::Name, ContactField::Subject]
        );
        assert_eq!(errors.get(ContactField::Name).unwrap(), [NULL_MESSAGE]);
        assert_eq!(
            errors.get(ContactField::Subject).unwrap(),
            [NOT_A_STRING_MESSAGE]
        );
    }

    #[test]
    fn serialize_errors() {
        let errors = ContactMessage::try_from(ContactSubmission {
            name: None,
            email: Some("not-an-email".into()),
            ..submission()
        })
        .unwrap_err();

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({
                "name": ["This field is required."],
                "email": ["Enter a valid email address."],
            })
        );
    }
}
