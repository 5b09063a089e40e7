use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;

/// Body of the custom actions (subscribe, status update...).
#[derive(Serialize, Debug)]
pub struct MessageEnvelope<T> {
    pub message: String,
    pub data: T,
}

impl<T> MessageEnvelope<T> {
    pub fn new(message: &str, data: T) -> Self {
        MessageEnvelope {
            message: String::from(message),
            data,
        }
    }
}

/// Body of the resource endpoints: `{ data, meta }`.
#[derive(Serialize, Debug)]
pub struct ResourceEnvelope<T, M> {
    pub data: T,
    pub meta: M,
}

#[derive(Serialize, Debug, Default)]
pub struct EmptyMeta {}

impl<T> ResourceEnvelope<T, EmptyMeta> {
    pub fn without_meta(data: T) -> Self {
        ResourceEnvelope {
            data,
            meta: EmptyMeta::default(),
        }
    }
}

#[derive(Serialize, Debug)]
struct ErrorBody<'a> {
    data: Option<()>,
    error: ErrorDetails<'a>,
}

#[derive(Serialize, Debug)]
struct ErrorDetails<'a> {
    status: u16,
    name: &'static str,
    message: &'a str,
    details: EmptyMeta,
}

fn error_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BadRequestError",
        StatusCode::NOT_FOUND => "NotFoundError",
        _ => "InternalServerError",
    }
}

/// Builds the `{ data: null, error: {...} }` body shared by every failure.
pub fn error_envelope(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        data: None,
        error: ErrorDetails {
            status: status.as_u16(),
            name: error_name(status),
            message,
            details: EmptyMeta::default(),
        },
    })
}

/// A body or query string that could not be deserialized.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct InvalidPayload(String);

impl ResponseError for InvalidPayload {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        error_envelope(self.status_code(), &self.0)
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected request body: {}", err);
    InvalidPayload(format!("Invalid request body: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected query string: {}", err);
    InvalidPayload(format!("Invalid query parameters: {}", err)).into()
}
