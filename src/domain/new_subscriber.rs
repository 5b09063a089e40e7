use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

/// A validated subscribe request.
#[derive(Debug, Clone)]
pub struct SubscribeRequest {
    pub email: SubscriberEmail,
    pub fullname: Option<SubscriberName>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SubscribeBody {
    pub email: Option<Value>,
    pub fullname: Option<String>,
}

impl TryFrom<SubscribeBody> for SubscribeRequest {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse_json(body.email)?;
        let fullname = SubscriberName::parse_optional(body.fullname)?;

        Ok(SubscribeRequest { email, fullname })
    }
}

/// Row to insert for a first-time subscriber.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub fullname: SubscriberName,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
}

impl NewSubscriber {
    pub fn from_request(request: SubscribeRequest, now: DateTime<Utc>) -> Self {
        NewSubscriber {
            email: request.email,
            fullname: request.fullname.unwrap_or_else(SubscriberName::anonymous),
            is_active: true,
            subscribed_at: now,
        }
    }
}
