use chrono::{DateTime, Utc};

use crate::domain::document_id::DocumentId;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: i64,
    pub document_id: DocumentId,
    pub email: SubscriberEmail,
    pub fullname: SubscriberName,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
}

/// Partial update of a subscriber. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SubscriberChanges {
    pub is_active: Option<bool>,
    pub fullname: Option<SubscriberName>,
    pub subscribed_at: Option<DateTime<Utc>>,
}

impl SubscriberChanges {
    pub fn reactivate(fullname: Option<SubscriberName>, now: DateTime<Utc>) -> Self {
        Self {
            is_active: Some(true),
            fullname,
            subscribed_at: Some(now),
        }
    }

    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }
}
