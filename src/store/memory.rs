use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{NewsletterStore, StoreError, SubscriberStore};
use crate::domain::doc_status::DocStatus;
use crate::domain::document_id::DocumentId;
use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::newsletter::{NewNewsletter, Newsletter, NewsletterChanges};
use crate::domain::newsletter_query::{NewsletterQuery, Page, SortDirection, SortField};
use crate::domain::subscriber::{Subscriber, SubscriberChanges};
use crate::domain::subscriber_email::SubscriberEmail;

/// Documents keyed by their numeric id, which also gives insertion order.
struct Collection<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Collection<T> {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct InMemorySubscriberStore {
    subscribers: RwLock<Collection<Subscriber>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let subscribers = self.subscribers.read().await;

        Ok(subscribers
            .rows
            .values()
            .find(|subscriber| &subscriber.email == email)
            .cloned())
    }

    async fn create(&self, new_subscriber: NewSubscriber) -> Result<Subscriber, StoreError> {
        let mut subscribers = self.subscribers.write().await;

        // Same guarantee as the unique index on subscribers.email
        if subscribers
            .rows
            .values()
            .any(|subscriber| subscriber.email == new_subscriber.email)
        {
            return Err(StoreError::Conflict(String::from("email")));
        }

        let id = subscribers.next_id();
        let subscriber = Subscriber {
            id,
            document_id: DocumentId::generate(),
            email: new_subscriber.email,
            fullname: new_subscriber.fullname,
            is_active: new_subscriber.is_active,
            subscribed_at: new_subscriber.subscribed_at,
        };
        subscribers.rows.insert(id, subscriber.clone());

        Ok(subscriber)
    }

    async fn update(
        &self,
        document_id: &DocumentId,
        changes: SubscriberChanges,
    ) -> Result<Option<Subscriber>, StoreError> {
        let mut subscribers = self.subscribers.write().await;

        let subscriber = match subscribers
            .rows
            .values_mut()
            .find(|subscriber| &subscriber.document_id == document_id)
        {
            Some(subscriber) => subscriber,
            None => return Ok(None),
        };

        if let Some(is_active) = changes.is_active {
            subscriber.is_active = is_active;
        }
        if let Some(fullname) = changes.fullname {
            subscriber.fullname = fullname;
        }
        if let Some(subscribed_at) = changes.subscribed_at {
            subscriber.subscribed_at = subscribed_at;
        }

        Ok(Some(subscriber.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryNewsletterStore {
    newsletters: RwLock<Collection<Newsletter>>,
}

impl InMemoryNewsletterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// NULL timestamps sort after any value, like PostgreSQL does by default.
fn compare_by(field: SortField, a: &Newsletter, b: &Newsletter) -> Ordering {
    let ordering = match field {
        SortField::Id => Ordering::Equal,
        SortField::Title => a.title.cmp(&b.title),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::SentAt => match (a.sent_at, b.sent_at) {
            (Some(a), Some(b)) => a.cmp(&b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
        },
    };

    ordering.then(a.id.cmp(&b.id))
}

#[async_trait]
impl NewsletterStore for InMemoryNewsletterStore {
    async fn find_many(&self, query: &NewsletterQuery) -> Result<Page<Newsletter>, StoreError> {
        let newsletters = self.newsletters.read().await;

        let mut matching: Vec<&Newsletter> = newsletters
            .rows
            .values()
            .filter(|newsletter| {
                query
                    .status
                    .map_or(true, |status| newsletter.doc_status == status)
            })
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare_by(query.sort.field, a, b);
            match query.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .cloned()
            .collect();

        Ok(Page { items, total })
    }

    async fn find_one(&self, document_id: &DocumentId) -> Result<Option<Newsletter>, StoreError> {
        let newsletters = self.newsletters.read().await;

        Ok(newsletters
            .rows
            .values()
            .find(|newsletter| &newsletter.document_id == document_id)
            .cloned())
    }

    async fn create(&self, new_newsletter: NewNewsletter) -> Result<Newsletter, StoreError> {
        let mut newsletters = self.newsletters.write().await;

        let id = newsletters.next_id();
        let newsletter = Newsletter {
            id,
            document_id: DocumentId::generate(),
            title: new_newsletter.title,
            subject: new_newsletter.subject,
            content: new_newsletter.content,
            doc_status: DocStatus::Draft,
            sent_at: None,
            created_at: new_newsletter.created_at,
            updated_at: new_newsletter.created_at,
        };
        newsletters.rows.insert(id, newsletter.clone());

        Ok(newsletter)
    }

    async fn update(
        &self,
        document_id: &DocumentId,
        changes: NewsletterChanges,
    ) -> Result<Option<Newsletter>, StoreError> {
        let mut newsletters = self.newsletters.write().await;

        Ok(newsletters
            .rows
            .values_mut()
            .find(|newsletter| &newsletter.document_id == document_id)
            .map(|newsletter| {
                newsletter.apply(changes);
                newsletter.clone()
            }))
    }

    async fn delete(&self, document_id: &DocumentId) -> Result<Option<Newsletter>, StoreError> {
        let mut newsletters = self.newsletters.write().await;

        let id = newsletters
            .rows
            .values()
            .find(|newsletter| &newsletter.document_id == document_id)
            .map(|newsletter| newsletter.id);

        Ok(id.and_then(|id| newsletters.rows.remove(&id)))
    }
}
