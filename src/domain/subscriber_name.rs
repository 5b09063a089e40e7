use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGHT: usize = 256;

pub const DEFAULT_FULLNAME: &str = "Anonymous";
pub const INVALID_FULLNAME: &str = "Invalid fullname";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubscriberName(String);

impl SubscriberName {
    /// Parses an optional full name. Blank input means "not supplied".
    pub fn parse_optional(name: Option<String>) -> Result<Option<SubscriberName>, String> {
        match name {
            Some(name) if !name.trim().is_empty() => Self::parse(name).map(Some),
            _ => Ok(None),
        }
    }

    pub fn parse(name: String) -> Result<SubscriberName, String> {
        let is_empty_or_whitespace = name.trim().is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_CHAR_LENGHT;

        if is_empty_or_whitespace || is_too_long {
            return Err(String::from(INVALID_FULLNAME));
        }

        Ok(Self(name))
    }

    pub fn anonymous() -> SubscriberName {
        Self(String::from(DEFAULT_FULLNAME))
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
