use rand::Rng;

const DOCUMENT_ID_LENGTH: usize = 24;

/// Stable identifier of a document, independent from the numeric row id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn parse(id: String) -> Result<DocumentId, String> {
        if id.trim().is_empty() {
            return Err(String::from("Missing document id"));
        }

        Ok(Self(id))
    }

    pub fn generate() -> DocumentId {
        let mut rng = rand::thread_rng();

        let id = std::iter::repeat_with(|| rng.sample(rand::distributions::Alphanumeric))
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .take(DOCUMENT_ID_LENGTH)
            .collect();

        Self(id)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
