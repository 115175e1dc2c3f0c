use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(pub lettre::Address);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressWithName(pub lettre::message::Mailbox);

impl EmailAddress {
    /// Maximum length of an email address, see RFC 5321.
    pub const MAX_LEN: usize = 254;

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl EmailAddressWithName {
    pub fn into_email_address(self) -> EmailAddress {
        EmailAddress(self.0.email)
    }
}

impl From<EmailAddress> for EmailAddressWithName {
    fn from(value: EmailAddress) -> Self {
        Self(lettre::message::Mailbox {
            name: None,
            email: value.0,
        })
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EmailAddress {
    type Err = <lettre::Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <lettre::message::Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let address = "alice@example.com".parse::<EmailAddress>().unwrap();
        assert_eq!(address.as_str(), "alice@example.com");

        for invalid in ["not-an-email", "@example.com", "alice@", ""] {
            assert!(invalid.parse::<EmailAddress>().is_err(), "{invalid}");
        }
    }

    #[test]
    fn mailbox_without_name() {
        let address = "alice@example.com".parse::<EmailAddress>().unwrap();
        let expected = "alice@example.com".parse::<EmailAddressWithName>().unwrap();
        assert_eq!(EmailAddressWithName::from(address), expected);
    }

    #[test]
    fn mailbox_with_name() {
        let mailbox = "Contact Form <contact@example.com>"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(mailbox.0.name.as_deref(), Some("Contact Form"));
        assert_eq!(
            mailbox.into_email_address().as_str(),
            "contact@example.com"
        );
    }
}
