use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        doc_status::DocStatus,
        document_id::DocumentId,
        newsletter::{Newsletter, NewsletterChanges, StatusChange},
    },
    routes::{error_chain_fmt, error_envelope, MessageEnvelope},
    store::{NewsletterStore, StoreError},
};

#[derive(Deserialize, Debug, Default)]
pub struct UpdateStatusBody {
    pub status: Option<serde_json::Value>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterStatusData {
    pub id: i64,
    pub document_id: DocumentId,
    pub doc_status: DocStatus,
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<Newsletter> for NewsletterStatusData {
    fn from(newsletter: Newsletter) -> Self {
        NewsletterStatusData {
            id: newsletter.id,
            document_id: newsletter.document_id,
            doc_status: newsletter.doc_status,
            sent_at: newsletter.sent_at,
        }
    }
}

#[derive(thiserror::Error)]
pub enum UpdateStatusError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Newsletter not found")]
    NotFound,
    #[error("Failed to update status")]
    StoreError(#[from] StoreError),
}

impl std::fmt::Debug for UpdateStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UpdateStatusError {
    fn status_code(&self) -> StatusCode {
        match self {
            UpdateStatusError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UpdateStatusError::NotFound => StatusCode::NOT_FOUND,
            UpdateStatusError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_envelope(self.status_code(), &self.to_string())
    }
}

#[tracing::instrument(
    name = "Updating a newsletter status",
    skip(path, body, store),
    fields(
        document_id = %path,
        status = ?body.status
    )
)]
pub async fn handle_update_newsletter_status(
    path: web::Path<String>,
    body: web::Json<UpdateStatusBody>,
    store: web::Data<dyn NewsletterStore>,
) -> Result<HttpResponse, UpdateStatusError> {
    let document_id = DocumentId::parse(path.into_inner())
        .map_err(|_| UpdateStatusError::ValidationError(String::from("Missing newsletter id")))?;
    let status = DocStatus::parse_json(body.into_inner().status)
        .map_err(UpdateStatusError::ValidationError)?;

    let updated = update_status(store.get_ref(), &document_id, status)
        .await
        .map_err(|err| {
            if let UpdateStatusError::StoreError(store_err) = &err {
                tracing::error!("Update newsletter status error: {:?}", store_err);
            }
            err
        })?;

    Ok(HttpResponse::Ok().json(MessageEnvelope::new(
        "Status updated successfully",
        NewsletterStatusData::from(updated),
    )))
}

/// Moves a newsletter to `status`; `sentAt` is stamped for `sent` and cleared for `draft`.
#[tracing::instrument(name = "Transition newsletter status", skip(store))]
pub async fn update_status(
    store: &dyn NewsletterStore,
    document_id: &DocumentId,
    status: DocStatus,
) -> Result<Newsletter, UpdateStatusError> {
    let existing = store
        .find_one(document_id)
        .await?
        .ok_or(UpdateStatusError::NotFound)?;

    if existing.doc_status.is_sent() && status.is_draft() {
        tracing::warn!(
            "Newsletter {} was already sent and is reverted to draft",
            document_id
        );
    }

    let now = Utc::now();
    let changes = NewsletterChanges::status_only(StatusChange::to(status, now), now);

    store
        .update(document_id, changes)
        .await?
        .ok_or(UpdateStatusError::NotFound)
}
