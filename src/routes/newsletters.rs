use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;

use crate::{
    domain::{
        document_id::DocumentId,
        newsletter::{NewNewsletter, Newsletter, NewsletterBody, NewsletterChanges, NewsletterInput},
        newsletter_query::{NewsletterQuery, NewsletterQueryParams},
    },
    routes::{error_chain_fmt, error_envelope, ResourceEnvelope},
    store::{NewsletterStore, StoreError},
};

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u64,
    pub total: u64,
}

impl Pagination {
    pub fn new(query: &NewsletterQuery, total: u64) -> Self {
        let page_size = u64::from(query.page_size);

        Pagination {
            page: query.page,
            page_size: query.page_size,
            page_count: (total + page_size - 1) / page_size,
            total,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ListMeta {
    pub pagination: Pagination,
}

#[derive(thiserror::Error)]
pub enum NewsletterError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Newsletter not found")]
    NotFound,
    #[error("Internal Server Error")]
    StoreError(#[from] StoreError),
}

impl std::fmt::Debug for NewsletterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for NewsletterError {
    fn status_code(&self) -> StatusCode {
        match self {
            NewsletterError::ValidationError(_) => StatusCode::BAD_REQUEST,
            NewsletterError::NotFound => StatusCode::NOT_FOUND,
            NewsletterError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_envelope(self.status_code(), &self.to_string())
    }
}

fn log_store_error(err: StoreError) -> NewsletterError {
    tracing::error!("Newsletter store error: {:?}", err);
    NewsletterError::StoreError(err)
}

fn parse_document_id(id: String) -> Result<DocumentId, NewsletterError> {
    DocumentId::parse(id)
        .map_err(|_| NewsletterError::ValidationError(String::from("Missing newsletter id")))
}

/// An empty body is an empty input; anything else must be JSON.
fn parse_input(body: &[u8]) -> Result<NewsletterInput, NewsletterError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewsletterInput::default());
    }

    serde_json::from_slice::<NewsletterBody>(body)
        .map(NewsletterBody::into_input)
        .map_err(|err| NewsletterError::ValidationError(format!("Invalid request body: {}", err)))
}

#[tracing::instrument(name = "Listing newsletters", skip(params, store))]
pub async fn handle_find_newsletters(
    params: web::Query<NewsletterQueryParams>,
    store: web::Data<dyn NewsletterStore>,
) -> Result<HttpResponse, NewsletterError> {
    let query =
        NewsletterQuery::try_from(params.into_inner()).map_err(NewsletterError::ValidationError)?;

    let page = store.find_many(&query).await.map_err(log_store_error)?;

    Ok(HttpResponse::Ok().json(ResourceEnvelope {
        data: page.items,
        meta: ListMeta {
            pagination: Pagination::new(&query, page.total),
        },
    }))
}

#[tracing::instrument(name = "Fetching a newsletter", skip(store))]
pub async fn handle_find_newsletter(
    path: web::Path<String>,
    store: web::Data<dyn NewsletterStore>,
) -> Result<HttpResponse, NewsletterError> {
    let document_id = parse_document_id(path.into_inner())?;

    let newsletter = store
        .find_one(&document_id)
        .await
        .map_err(log_store_error)?
        .ok_or(NewsletterError::NotFound)?;

    Ok(HttpResponse::Ok().json(ResourceEnvelope::without_meta(newsletter)))
}

#[tracing::instrument(name = "Creating a newsletter", skip(body, store))]
pub async fn handle_create_newsletter(
    body: web::Bytes,
    store: web::Data<dyn NewsletterStore>,
) -> Result<HttpResponse, NewsletterError> {
    let input = parse_input(&body)?;

    let newsletter = create_newsletter(store.get_ref(), input)
        .await
        .map_err(log_store_error)?;

    Ok(HttpResponse::Ok().json(ResourceEnvelope::without_meta(newsletter)))
}

/// Creates a draft, filling in default title, subject and content.
pub async fn create_newsletter(
    store: &dyn NewsletterStore,
    input: NewsletterInput,
) -> Result<Newsletter, StoreError> {
    if input.doc_status.is_some() {
        tracing::debug!("Ignoring docStatus on creation, newsletters start as drafts");
    }

    store.create(NewNewsletter::from_input(input, Utc::now())).await
}

#[tracing::instrument(name = "Updating a newsletter", skip(body, store))]
pub async fn handle_update_newsletter(
    path: web::Path<String>,
    body: web::Bytes,
    store: web::Data<dyn NewsletterStore>,
) -> Result<HttpResponse, NewsletterError> {
    let document_id = parse_document_id(path.into_inner())?;
    let input = parse_input(&body)?;
    let changes = NewsletterChanges::try_from_input(input, Utc::now())
        .map_err(NewsletterError::ValidationError)?;

    let newsletter = store
        .update(&document_id, changes)
        .await
        .map_err(log_store_error)?
        .ok_or(NewsletterError::NotFound)?;

    Ok(HttpResponse::Ok().json(ResourceEnvelope::without_meta(newsletter)))
}

#[tracing::instrument(name = "Deleting a newsletter", skip(store))]
pub async fn handle_delete_newsletter(
    path: web::Path<String>,
    store: web::Data<dyn NewsletterStore>,
) -> Result<HttpResponse, NewsletterError> {
    let document_id = parse_document_id(path.into_inner())?;

    let newsletter = store
        .delete(&document_id)
        .await
        .map_err(log_store_error)?
        .ok_or(NewsletterError::NotFound)?;

    Ok(HttpResponse::Ok().json(ResourceEnvelope::without_meta(newsletter)))
}
