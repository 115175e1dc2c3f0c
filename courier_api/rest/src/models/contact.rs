use courier_models::contact::{ContactFieldValue, ContactSubmission};
use serde::{de::IgnoredAny, Deserialize, Deserializer};

/// Contact form fields as sent by the client. Missing fields and values of
/// the wrong type are reported as validation errors instead of failing to
/// deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactSubmission {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<ApiContactField>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<ApiContactField>,
    #[serde(default, deserialize_with = "present")]
    pub subject: Option<ApiContactField>,
    #[serde(default, deserialize_with = "present")]
    pub message: Option<ApiContactField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiContactField {
    Text(String),
    Number(serde_json::Number),
    Null,
    Other(IgnoredAny),
}

/// Keeps an explicit `null` apart from a missing field.
fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ApiContactField>, D::Error> {
    ApiContactField::deserialize(deserializer).map(Some)
}

impl From<ApiContactField> for ContactFieldValue {
    fn from(value: ApiContactField) -> Self {
        match value {
            ApiContactField::Text(text) => Self::Text(text),
            ApiContactField::Number(number) => Self::Text(number.to_string()),
            ApiContactField::Null => Self::Null,
            ApiContactField::Other(_) => Self::NotAString,
        }
    }
}

impl From<ApiContactSubmission> for ContactSubmission {
    fn from(value: ApiContactSubmission) -> Self {
        Self {
            name: value.name.map(Into::into),
            email: value.email.map(Into::into),
            subject: value.subject.map(Into::into),
            message: value.message.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use courier_models::contact::ContactFieldValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> ContactSubmission {
        serde_json::from_value::<ApiContactSubmission>(value)
            .unwrap()
            .into()
    }

    #[test]
    fn strings() {
        let submission = parse(json!({"name": "Alice", "message": ""}));

        assert_eq!(submission.name, Some(ContactFieldValue::Text("Alice".into())));
        assert_eq!(submission.email, None);
        assert_eq!(submission.subject, None);
        assert_eq!(submission.message, Some(ContactFieldValue::Text("".into())));
    }

    #[test]
    fn numbers_become_text() {
        let submission = parse(json!({"name": 42, "subject": 1.5}));

        assert_eq!(submission.name, Some(ContactFieldValue::Text("42".into())));
        assert_eq!(submission.subject, Some(ContactFieldValue::Text("1.5".into())));
    }

    #[test]
    fn null_is_not_missing() {
        let submission = parse(json!({"name": null}));

        assert_eq!(submission.name, Some(ContactFieldValue::Null));
        assert_eq!(submission.email, None);
    }

    #[test]
    fn other_types_are_not_strings() {
        let submission = parse(json!({
            "name": ["x"],
            "email": {"address": "alice@example.com"},
            "subject": true,
        }));

        assert_eq!(submission.name, Some(ContactFieldValue::NotAString));
        assert_eq!(submission.email, Some(ContactFieldValue::NotAString));
        assert_eq!(submission.subject, Some(ContactFieldValue::NotAString));
        assert_eq!(submission.message, None);
    }
}
