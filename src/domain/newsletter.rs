use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::doc_status::DocStatus;
use crate::domain::document_id::DocumentId;

pub const DEFAULT_TITLE: &str = "Untitled Newsletter";
pub const DEFAULT_SUBJECT: &str = "No Subject";
pub const DEFAULT_CONTENT: &str = "";

/// Public representation of a newsletter document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    pub id: i64,
    pub document_id: DocumentId,
    pub title: String,
    pub subject: String,
    pub content: String,
    pub doc_status: DocStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable newsletter fields as received from clients. Anything else in the
/// payload (ids, timestamps, sentAt) is dropped during deserialization.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterInput {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub doc_status: Option<String>,
}

/// Newsletter payloads are accepted either wrapped in `data` or bare.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum NewsletterBody {
    Wrapped { data: NewsletterInput },
    Bare(NewsletterInput),
}

impl NewsletterBody {
    pub fn into_input(self) -> NewsletterInput {
        match self {
            NewsletterBody::Wrapped { data } => data,
            NewsletterBody::Bare(input) => input,
        }
    }
}

/// Row to insert. New newsletters are always drafts without `sentAt`.
#[derive(Debug, Clone)]
pub struct NewNewsletter {
    pub title: String,
    pub subject: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewNewsletter {
    /// Fills the missing fields with defaults. A supplied `docStatus` is ignored.
    pub fn from_input(input: NewsletterInput, now: DateTime<Utc>) -> Self {
        NewNewsletter {
            title: input.title.unwrap_or_else(|| String::from(DEFAULT_TITLE)),
            subject: input.subject.unwrap_or_else(|| String::from(DEFAULT_SUBJECT)),
            content: input.content.unwrap_or_else(|| String::from(DEFAULT_CONTENT)),
            created_at: now,
        }
    }
}

/// A status together with the `sentAt` it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusChange {
    pub doc_status: DocStatus,
    pub sent_at: Option<DateTime<Utc>>,
}

impl StatusChange {
    pub fn to(doc_status: DocStatus, now: DateTime<Utc>) -> Self {
        let sent_at = match doc_status {
            DocStatus::Sent => Some(now),
            DocStatus::Draft => None,
        };

        StatusChange {
            doc_status,
            sent_at,
        }
    }
}

/// Partial update of a newsletter. `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct NewsletterChanges {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub status: Option<StatusChange>,
    pub updated_at: DateTime<Utc>,
}

impl NewsletterChanges {
    pub fn status_only(status: StatusChange, now: DateTime<Utc>) -> Self {
        NewsletterChanges {
            title: None,
            subject: None,
            content: None,
            status: Some(status),
            updated_at: now,
        }
    }

    pub fn try_from_input(input: NewsletterInput, now: DateTime<Utc>) -> Result<Self, String> {
        let status = input
            .doc_status
            .map(DocStatus::parse)
            .transpose()?
            .map(|doc_status| StatusChange::to(doc_status, now));

        Ok(NewsletterChanges {
            title: input.title,
            subject: input.subject,
            content: input.content,
            status,
            updated_at: now,
        })
    }
}

impl Newsletter {
    /// Applies `changes` in place. Shared by stores that keep documents in memory.
    pub fn apply(&mut self, changes: NewsletterChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(subject) = changes.subject {
            self.subject = subject;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(status) = changes.status {
            self.doc_status = status.doc_status;
            self.sent_at = status.sent_at;
        }
        self.updated_at = changes.updated_at;
    }
}
