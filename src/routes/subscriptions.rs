use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        new_subscriber::{NewSubscriber, SubscribeBody, SubscribeRequest},
        subscriber::{Subscriber, SubscriberChanges},
        subscriber_email::SubscriberEmail,
        subscriber_name::SubscriberName,
    },
    routes::{error_chain_fmt, error_envelope, MessageEnvelope},
    store::{StoreError, SubscriberStore},
};

/// Subscriber fields exposed by the subscription endpoints.
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionData {
    pub email: String,
    pub is_active: bool,
}

impl From<&Subscriber> for SubscriptionData {
    fn from(subscriber: &Subscriber) -> Self {
        SubscriptionData {
            email: String::from(subscriber.email.as_ref()),
            is_active: subscriber.is_active,
        }
    }
}

#[derive(Debug)]
pub enum SubscribeOutcome {
    Subscribed(Subscriber),
    Reactivated(Subscriber),
    AlreadySubscribed(Subscriber),
}

impl SubscribeOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SubscribeOutcome::Subscribed(_) => "Successfully subscribed to newsletter!",
            SubscribeOutcome::Reactivated(_) => "Successfully reactivated your subscription!",
            SubscribeOutcome::AlreadySubscribed(_) => {
                "You are already subscribed to our newsletter!"
            }
        }
    }

    pub fn subscriber(&self) -> &Subscriber {
        match self {
            SubscribeOutcome::Subscribed(subscriber)
            | SubscribeOutcome::Reactivated(subscriber)
            | SubscribeOutcome::AlreadySubscribed(subscriber) => subscriber,
        }
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to process subscription. Please try again later.")]
    StoreError(#[from] StoreError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_envelope(self.status_code(), &self.to_string())
    }
}

#[tracing::instrument(
    name = "Subscribing to the newsletter",
    skip(body, store),
    fields(
        subscriber_email = ?body.email,
        subscriber_fullname = ?body.fullname
    )
)]
pub async fn handle_subscribe(
    body: web::Json<SubscribeBody>,
    store: web::Data<dyn SubscriberStore>,
) -> Result<HttpResponse, SubscribeError> {
    let request: SubscribeRequest = body.into_inner().try_into().map_err(|err: String| {
        tracing::warn!("Validation error: {}", err);
        SubscribeError::ValidationError(err)
    })?;

    let outcome = subscribe(store.get_ref(), request).await.map_err(|err| {
        tracing::error!("Newsletter subscription error: {:?}", err);
        SubscribeError::from(err)
    })?;

    Ok(HttpResponse::Ok().json(MessageEnvelope::new(
        outcome.message(),
        SubscriptionData::from(outcome.subscriber()),
    )))
}

/// Subscribes `request.email`, reactivating it when it exists but is inactive.
///
/// Performs at most one write. When the create loses a race against a
/// concurrent subscribe for the same email, the stored row is read back and
/// handled as an existing subscriber.
#[tracing::instrument(name = "Subscribe or reactivate", skip(store, request))]
pub async fn subscribe(
    store: &dyn SubscriberStore,
    request: SubscribeRequest,
) -> Result<SubscribeOutcome, StoreError> {
    if let Some(existing) = store.find_by_email(&request.email).await? {
        return resubscribe(store, existing, request.fullname).await;
    }

    let new_subscriber = NewSubscriber::from_request(request.clone(), Utc::now());

    match store.create(new_subscriber).await {
        Ok(subscriber) => Ok(SubscribeOutcome::Subscribed(subscriber)),
        Err(StoreError::Conflict(field)) => {
            tracing::info!("Concurrent subscription detected, reading the stored subscriber");
            let existing = store
                .find_by_email(&request.email)
                .await?
                .ok_or(StoreError::Conflict(field))?;
            resubscribe(store, existing, request.fullname).await
        }
        Err(err) => Err(err),
    }
}

async fn resubscribe(
    store: &dyn SubscriberStore,
    existing: Subscriber,
    fullname: Option<SubscriberName>,
) -> Result<SubscribeOutcome, StoreError> {
    if existing.is_active {
        return Ok(SubscribeOutcome::AlreadySubscribed(existing));
    }

    let changes = SubscriberChanges::reactivate(fullname, Utc::now());

    store
        .update(&existing.document_id, changes)
        .await?
        .map(SubscribeOutcome::Reactivated)
        .ok_or_else(|| missing_subscriber(&existing))
}

fn missing_subscriber(subscriber: &Subscriber) -> StoreError {
    StoreError::Corrupted(format!(
        "subscriber {} disappeared during update",
        subscriber.document_id
    ))
}

#[derive(Deserialize, Debug, Default)]
pub struct UnsubscribeBody {
    pub email: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum UnsubscribeOutcome {
    Unsubscribed(Subscriber),
    NotSubscribed(Subscriber),
}

impl UnsubscribeOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            UnsubscribeOutcome::Unsubscribed(_) => "Successfully unsubscribed from newsletter.",
            UnsubscribeOutcome::NotSubscribed(_) => "You are not subscribed to our newsletter.",
        }
    }

    pub fn subscriber(&self) -> &Subscriber {
        match self {
            UnsubscribeOutcome::Unsubscribed(subscriber)
            | UnsubscribeOutcome::NotSubscribed(subscriber) => subscriber,
        }
    }
}

#[derive(thiserror::Error)]
pub enum UnsubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Subscriber not found")]
    NotFound,
    #[error("Failed to process unsubscription. Please try again later.")]
    StoreError(#[from] StoreError),
}

impl std::fmt::Debug for UnsubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UnsubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            UnsubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UnsubscribeError::NotFound => StatusCode::NOT_FOUND,
            UnsubscribeError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_envelope(self.status_code(), &self.to_string())
    }
}

#[tracing::instrument(
    name = "Unsubscribing from the newsletter",
    skip(body, store),
    fields(subscriber_email = ?body.email)
)]
pub async fn handle_unsubscribe(
    body: web::Json<UnsubscribeBody>,
    store: web::Data<dyn SubscriberStore>,
) -> Result<HttpResponse, UnsubscribeError> {
    let email = SubscriberEmail::parse_json(body.into_inner().email)
        .map_err(UnsubscribeError::ValidationError)?;

    let outcome = unsubscribe(store.get_ref(), &email).await.map_err(|err| {
        if let UnsubscribeError::StoreError(store_err) = &err {
            tracing::error!("Newsletter unsubscription error: {:?}", store_err);
        }
        err
    })?;

    Ok(HttpResponse::Ok().json(MessageEnvelope::new(
        outcome.message(),
        SubscriptionData::from(outcome.subscriber()),
    )))
}

/// Deactivates a subscriber. Rows are never deleted.
#[tracing::instrument(name = "Deactivate a subscriber", skip(store))]
pub async fn unsubscribe(
    store: &dyn SubscriberStore,
    email: &SubscriberEmail,
) -> Result<UnsubscribeOutcome, UnsubscribeError> {
    let existing = store
        .find_by_email(email)
        .await?
        .ok_or(UnsubscribeError::NotFound)?;

    if !existing.is_active {
        return Ok(UnsubscribeOutcome::NotSubscribed(existing));
    }

    let updated = store
        .update(&existing.document_id, SubscriberChanges::deactivate())
        .await?
        .ok_or_else(|| missing_subscriber(&existing))?;

    Ok(UnsubscribeOutcome::Unsubscribed(updated))
}
