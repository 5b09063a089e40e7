pub const INVALID_DOC_STATUS: &str = r#"Invalid status. Must be either "draft" or "sent""#;

/// Publication state of a newsletter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Draft,
    Sent,
}

impl DocStatus {
    pub fn is_draft(&self) -> bool {
        matches!(self, DocStatus::Draft)
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, DocStatus::Sent)
    }

    pub fn parse(status: String) -> Result<DocStatus, String> {
        match status.as_str() {
            "draft" => Ok(DocStatus::Draft),
            "sent" => Ok(DocStatus::Sent),
            _ => Err(String::from(INVALID_DOC_STATUS)),
        }
    }

    /// Parses the raw `status` field of a request body; anything but one of the two literals is invalid.
    pub fn parse_json(value: Option<serde_json::Value>) -> Result<DocStatus, String> {
        match value {
            Some(serde_json::Value::String(status)) => Self::parse(status),
            _ => Err(String::from(INVALID_DOC_STATUS)),
        }
    }
}

impl AsRef<str> for DocStatus {
    fn as_ref(&self) -> &str {
        match self {
            DocStatus::Draft => "draft",
            DocStatus::Sent => "sent",
        }
    }
}
