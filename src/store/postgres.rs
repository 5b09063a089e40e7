use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{NewsletterStore, StoreError, SubscriberStore};
use crate::domain::doc_status::DocStatus;
use crate::domain::document_id::DocumentId;
use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::newsletter::{NewNewsletter, Newsletter, NewsletterChanges};
use crate::domain::newsletter_query::{NewsletterQuery, Page, SortDirection, SortField};
use crate::domain::subscriber::{Subscriber, SubscriberChanges};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

const UNIQUE_VIOLATION: &str = "23505";

const SUBSCRIBER_COLUMNS: &str = "id, document_id, email, fullname, is_active, subscribed_at";
const NEWSLETTER_COLUMNS: &str =
    "id, document_id, title, subject, content, doc_status, sent_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    id: i64,
    document_id: String,
    email: String,
    fullname: String,
    is_active: bool,
    subscribed_at: DateTime<Utc>,
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = StoreError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        Ok(Subscriber {
            id: row.id,
            document_id: DocumentId::parse(row.document_id).map_err(StoreError::Corrupted)?,
            email: SubscriberEmail::parse(row.email).map_err(StoreError::Corrupted)?,
            fullname: SubscriberName::parse(row.fullname).map_err(StoreError::Corrupted)?,
            is_active: row.is_active,
            subscribed_at: row.subscribed_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct NewsletterRow {
    id: i64,
    document_id: String,
    title: String,
    subject: String,
    content: String,
    doc_status: String,
    sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<NewsletterRow> for Newsletter {
    type Error = StoreError;

    fn try_from(row: NewsletterRow) -> Result<Self, Self::Error> {
        Ok(Newsletter {
            id: row.id,
            document_id: DocumentId::parse(row.document_id).map_err(StoreError::Corrupted)?,
            title: row.title,
            subject: row.subject,
            content: row.content,
            doc_status: DocStatus::parse(row.doc_status).map_err(StoreError::Corrupted)?,
            sent_at: row.sent_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_insert_error(err: sqlx::Error, unique_field: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict(String::from(unique_field))
        }
        _ => StoreError::Database(err),
    }
}

fn log_query_error(err: sqlx::Error) -> sqlx::Error {
    tracing::error!("Failed to execute query: {:?}", err);
    err
}

pub struct PostgresSubscriberStore {
    db_pool: PgPool,
}

impl PostgresSubscriberStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberStore for PostgresSubscriberStore {
    #[tracing::instrument(name = "Find a subscriber by email", skip(self))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let query = format!(
            "SELECT {} FROM subscribers WHERE email = $1 LIMIT 1",
            SUBSCRIBER_COLUMNS
        );

        sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(email.as_ref())
            .fetch_optional(&self.db_pool)
            .await
            .map_err(log_query_error)?
            .map(Subscriber::try_from)
            .transpose()
    }

    #[tracing::instrument(
        name = "Insert a new subscriber into the database",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email)
    )]
    async fn create(&self, new_subscriber: NewSubscriber) -> Result<Subscriber, StoreError> {
        let query = format!(
            r#"
            INSERT INTO subscribers (document_id, email, fullname, is_active, subscribed_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SUBSCRIBER_COLUMNS
        );

        let row = sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(DocumentId::generate().as_ref())
            .bind(new_subscriber.email.as_ref())
            .bind(new_subscriber.fullname.as_ref())
            .bind(new_subscriber.is_active)
            .bind(new_subscriber.subscribed_at)
            .fetch_one(&self.db_pool)
            .await
            .map_err(|err| map_insert_error(log_query_error(err), "email"))?;

        Subscriber::try_from(row)
    }

    #[tracing::instrument(name = "Update a subscriber", skip(self, changes))]
    async fn update(
        &self,
        document_id: &DocumentId,
        changes: SubscriberChanges,
    ) -> Result<Option<Subscriber>, StoreError> {
        let query = format!(
            r#"
            UPDATE subscribers
            SET is_active = COALESCE($2, is_active),
                fullname = COALESCE($3, fullname),
                subscribed_at = COALESCE($4, subscribed_at)
            WHERE document_id = $1
            RETURNING {}
            "#,
            SUBSCRIBER_COLUMNS
        );

        sqlx::query_as::<_, SubscriberRow>(&query)
            .bind(document_id.as_ref())
            .bind(changes.is_active)
            .bind(changes.fullname.as_ref().map(|name| name.as_ref().to_owned()))
            .bind(changes.subscribed_at)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(log_query_error)?
            .map(Subscriber::try_from)
            .transpose()
    }
}

pub struct PostgresNewsletterStore {
    db_pool: PgPool,
}

impl PostgresNewsletterStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

fn order_by(query: &NewsletterQuery) -> String {
    let column = match query.sort.field {
        SortField::Id => "id",
        SortField::Title => "title",
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::SentAt => "sent_at",
    };
    let direction = match query.sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    if column == "id" {
        format!("id {}", direction)
    } else {
        format!("{} {}, id {}", column, direction, direction)
    }
}

#[async_trait]
impl NewsletterStore for PostgresNewsletterStore {
    #[tracing::instrument(name = "List newsletters", skip(self))]
    async fn find_many(&self, query: &NewsletterQuery) -> Result<Page<Newsletter>, StoreError> {
        let status = query.status.map(|status| status.as_ref().to_owned());
        let select = format!(
            r#"
            SELECT {}
            FROM newsletters
            WHERE ($1::text IS NULL OR doc_status = $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            NEWSLETTER_COLUMNS,
            order_by(query)
        );

        let rows = sqlx::query_as::<_, NewsletterRow>(&select)
            .bind(status.as_deref())
            .bind(i64::from(query.page_size))
            .bind(query.offset() as i64)
            .fetch_all(&self.db_pool)
            .await
            .map_err(log_query_error)?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM newsletters WHERE ($1::text IS NULL OR doc_status = $1)",
        )
        .bind(status.as_deref())
        .fetch_one(&self.db_pool)
        .await
        .map_err(log_query_error)?;

        let items = rows
            .into_iter()
            .map(Newsletter::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
        })
    }

    #[tracing::instrument(name = "Find a newsletter", skip(self))]
    async fn find_one(&self, document_id: &DocumentId) -> Result<Option<Newsletter>, StoreError> {
        let query = format!(
            "SELECT {} FROM newsletters WHERE document_id = $1",
            NEWSLETTER_COLUMNS
        );

        sqlx::query_as::<_, NewsletterRow>(&query)
            .bind(document_id.as_ref())
            .fetch_optional(&self.db_pool)
            .await
            .map_err(log_query_error)?
            .map(Newsletter::try_from)
            .transpose()
    }

    #[tracing::instrument(
        name = "Insert a new newsletter into the database",
        skip(self, new_newsletter),
        fields(title = %new_newsletter.title)
    )]
    async fn create(&self, new_newsletter: NewNewsletter) -> Result<Newsletter, StoreError> {
        let query = format!(
            r#"
            INSERT INTO newsletters
                (document_id, title, subject, content, doc_status, sent_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NULL, $6, $6)
            RETURNING {}
            "#,
            NEWSLETTER_COLUMNS
        );

        let row = sqlx::query_as::<_, NewsletterRow>(&query)
            .bind(DocumentId::generate().as_ref())
            .bind(&new_newsletter.title)
            .bind(&new_newsletter.subject)
            .bind(&new_newsletter.content)
            .bind(DocStatus::Draft.as_ref())
            .bind(new_newsletter.created_at)
            .fetch_one(&self.db_pool)
            .await
            .map_err(|err| map_insert_error(log_query_error(err), "document_id"))?;

        Newsletter::try_from(row)
    }

    #[tracing::instrument(name = "Update a newsletter", skip(self, changes))]
    async fn update(
        &self,
        document_id: &DocumentId,
        changes: NewsletterChanges,
    ) -> Result<Option<Newsletter>, StoreError> {
        let query = format!(
            r#"
            UPDATE newsletters
            SET title = COALESCE($2, title),
                subject = COALESCE($3, subject),
                content = COALESCE($4, content),
                doc_status = COALESCE($5, doc_status),
                sent_at = CASE WHEN $6 THEN $7 ELSE sent_at END,
                updated_at = $8
            WHERE document_id = $1
            RETURNING {}
            "#,
            NEWSLETTER_COLUMNS
        );
        let doc_status = changes
            .status
            .map(|status| status.doc_status.as_ref().to_owned());
        let sent_at = changes.status.and_then(|status| status.sent_at);

        sqlx::query_as::<_, NewsletterRow>(&query)
            .bind(document_id.as_ref())
            .bind(changes.title)
            .bind(changes.subject)
            .bind(changes.content)
            .bind(doc_status)
            .bind(changes.status.is_some())
            .bind(sent_at)
            .bind(changes.updated_at)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(log_query_error)?
            .map(Newsletter::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Delete a newsletter", skip(self))]
    async fn delete(&self, document_id: &DocumentId) -> Result<Option<Newsletter>, StoreError> {
        let query = format!(
            "DELETE FROM newsletters WHERE document_id = $1 RETURNING {}",
            NEWSLETTER_COLUMNS
        );

        sqlx::query_as::<_, NewsletterRow>(&query)
            .bind(document_id.as_ref())
            .fetch_optional(&self.db_pool)
            .await
            .map_err(log_query_error)?
            .map(Newsletter::try_from)
            .transpose()
    }
}
