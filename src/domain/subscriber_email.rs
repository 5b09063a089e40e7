use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// local@domain.tld: ASCII only, no whitespace anywhere, a single '@' and at least one '.' after it
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email pattern"));

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Emails are kept exactly as received; lookups are case-sensitive.
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        if email.is_empty() {
            return Err(String::from(EMAIL_REQUIRED));
        }

        if !email.is_ascii() || !EMAIL_PATTERN.is_match(&email) {
            return Err(String::from(INVALID_EMAIL_FORMAT));
        }

        Ok(Self(email))
    }

    /// Parses the raw `email` field of a request body. `null` counts as missing,
    /// any other non-string value is malformed.
    pub fn parse_json(value: Option<Value>) -> Result<SubscriberEmail, String> {
        match value {
            None | Some(Value::Null) => Err(String::from(EMAIL_REQUIRED)),
            Some(Value::String(email)) => Self::parse(email),
            Some(_) => Err(String::from(INVALID_EMAIL_FORMAT)),
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
