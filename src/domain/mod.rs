pub mod doc_status;
pub mod document_id;
pub mod new_subscriber;
pub mod newsletter;
pub mod newsletter_query;
pub mod subscriber;
pub mod subscriber_email;
pub mod subscriber_name;
