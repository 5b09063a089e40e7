//! Document store abstraction.
//!
//! Each collection is reached through its own repository trait so handlers
//! receive the store as an injected `web::Data<dyn ...>` instead of looking
//! it up by name. Two backends exist: PostgreSQL and an in-memory one.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::document_id::DocumentId;
use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::newsletter::{NewNewsletter, Newsletter, NewsletterChanges};
use crate::domain::newsletter_query::{NewsletterQuery, Page};
use crate::domain::subscriber::{Subscriber, SubscriberChanges};
use crate::domain::subscriber_email::SubscriberEmail;

pub use memory::{InMemoryNewsletterStore, InMemorySubscriberStore};
pub use postgres::{PostgresNewsletterStore, PostgresSubscriberStore};

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("A document with the same {0} already exists.")]
    Conflict(String),
    #[error("Stored document is invalid: {0}")]
    Corrupted(String),
    #[error("Failed to execute a database query.")]
    Database(#[from] sqlx::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::routes::error_chain_fmt(self, f)
    }
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Exact, case-sensitive email match. At most one subscriber is returned.
    async fn find_by_email(&self, email: &SubscriberEmail)
        -> Result<Option<Subscriber>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the email is already stored.
    async fn create(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError>;

    async fn update(
        &self,
        document_id: &DocumentId,
        changes: SubscriberChanges,
    ) -> Result<Option<Subscriber>, StoreError>;
}

#[async_trait]
pub trait NewsletterStore: Send + Sync {
    async fn find_many(&self, query: &NewsletterQuery) -> Result<Page<Newsletter>, StoreError>;

    async fn find_one(&self, document_id: &DocumentId) -> Result<Option<Newsletter>, StoreError>;

    async fn create(&self, newsletter: NewNewsletter) -> Result<Newsletter, StoreError>;

    async fn update(
        &self,
        document_id: &DocumentId,
        changes: NewsletterChanges,
    ) -> Result<Option<Newsletter>, StoreError>;

    async fn delete(&self, document_id: &DocumentId) -> Result<Option<Newsletter>, StoreError>;
}
