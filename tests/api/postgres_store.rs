//! Round trips through the Postgres stores. They need the database from
//! `config/base.yaml`: `cargo test -- --ignored`.

use chrono::Utc;
use claim::{assert_matches, assert_none, assert_ok, assert_some};
use serde_json::json;

use newsletter_api::{
    config::get_configuration,
    domain::{
        doc_status::DocStatus,
        new_subscriber::NewSubscriber,
        newsletter::{NewNewsletter, NewsletterChanges, StatusChange},
        newsletter_query::{NewsletterQuery, Sort},
        subscriber::SubscriberChanges,
        subscriber_email::SubscriberEmail,
        subscriber_name::SubscriberName,
    },
    store::{
        NewsletterStore, PostgresNewsletterStore, PostgresSubscriberStore, StoreError,
        SubscriberStore,
    },
};

use crate::helpers::{configure_db, TestApp};

async fn subscriber_store() -> PostgresSubscriberStore {
    let mut config = get_configuration().expect("Missing configuration file.");

    PostgresSubscriberStore::new(configure_db(&mut config.database).await)
}

async fn newsletter_store() -> PostgresNewsletterStore {
    let mut config = get_configuration().expect("Missing configuration file.");

    PostgresNewsletterStore::new(configure_db(&mut config.database).await)
}

fn new_subscriber(email: &str, fullname: &str) -> NewSubscriber {
    NewSubscriber {
        email: SubscriberEmail::parse(email.to_string()).unwrap(),
        fullname: SubscriberName::parse(fullname.to_string()).unwrap(),
        is_active: true,
        subscribed_at: Utc::now(),
    }
}

fn new_newsletter(title: &str) -> NewNewsletter {
    NewNewsletter {
        title: title.to_string(),
        subject: String::from("No Subject"),
        content: String::new(),
        created_at: Utc::now(),
    }
}

fn status_change(status: DocStatus) -> NewsletterChanges {
    let now = Utc::now();

    NewsletterChanges::status_only(StatusChange::to(status, now), now)
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn duplicate_email_is_a_conflict() {
    let store = subscriber_store().await;
    assert_ok!(store.create(new_subscriber("frank@test.com", "Frank")).await);

    let result = store.create(new_subscriber("frank@test.com", "Other")).await;

    assert_matches!(result, Err(StoreError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn subscriber_lookup_is_case_sensitive() {
    let store = subscriber_store().await;
    store
        .create(new_subscriber("frank@test.com", "Frank"))
        .await
        .unwrap();

    let upper = SubscriberEmail::parse("Frank@test.com".to_string()).unwrap();
    let exact = SubscriberEmail::parse("frank@test.com".to_string()).unwrap();

    assert_none!(store.find_by_email(&upper).await.unwrap());
    assert_some!(store.find_by_email(&exact).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn subscriber_update_keeps_fields_that_are_not_changed() {
    let store = subscriber_store().await;
    let created = store
        .create(new_subscriber("frank@test.com", "Frank"))
        .await
        .unwrap();

    let updated = store
        .update(&created.document_id, SubscriberChanges::deactivate())
        .await
        .unwrap()
        .expect("Subscriber was not found.");

    assert!(!updated.is_active);
    assert_eq!(updated.fullname.as_ref(), "Frank");
    assert_eq!(updated.subscribed_at, created.subscribed_at);
    assert_eq!(updated.document_id, created.document_id);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn newsletter_status_changes_set_and_clear_sent_at() {
    let store = newsletter_store().await;
    let created = store.create(new_newsletter("Weekly")).await.unwrap();
    assert_eq!(created.doc_status, DocStatus::Draft);
    assert_none!(created.sent_at);

    let sent = store
        .update(&created.document_id, status_change(DocStatus::Sent))
        .await
        .unwrap()
        .expect("Newsletter was not found.");
    assert_eq!(sent.doc_status, DocStatus::Sent);
    assert_some!(sent.sent_at);

    let draft = store
        .update(&created.document_id, status_change(DocStatus::Draft))
        .await
        .unwrap()
        .expect("Newsletter was not found.");
    assert_eq!(draft.doc_status, DocStatus::Draft);
    assert_none!(draft.sent_at);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn newsletter_partial_update_keeps_status_and_sent_at() {
    let store = newsletter_store().await;
    let created = store.create(new_newsletter("Weekly")).await.unwrap();
    let sent = store
        .update(&created.document_id, status_change(DocStatus::Sent))
        .await
        .unwrap()
        .unwrap();

    let changes = NewsletterChanges {
        title: Some(String::from("Monthly")),
        subject: None,
        content: None,
        status: None,
        updated_at: Utc::now(),
    };
    let updated = store
        .update(&created.document_id, changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Monthly");
    assert_eq!(updated.subject, created.subject);
    assert_eq!(updated.doc_status, DocStatus::Sent);
    assert_eq!(updated.sent_at, sent.sent_at);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn newsletter_listing_filters_sorts_and_counts() {
    let store = newsletter_store().await;
    for title in ["a", "b", "c"] {
        store.create(new_newsletter(title)).await.unwrap();
    }
    let sent = store.create(new_newsletter("d")).await.unwrap();
    store
        .update(&sent.document_id, status_change(DocStatus::Sent))
        .await
        .unwrap();

    let query = NewsletterQuery {
        status: Some(DocStatus::Draft),
        page: 1,
        page_size: 2,
        sort: Sort::parse("title:desc").unwrap(),
    };
    let page = store.find_many(&query).await.unwrap();

    assert_eq!(page.total, 3);
    let titles: Vec<&str> = page.items.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "b"]);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn deleted_newsletter_is_returned_once() {
    let store = newsletter_store().await;
    let created = store.create(new_newsletter("bye")).await.unwrap();

    let deleted = store.delete(&created.document_id).await.unwrap();

    assert_eq!(assert_some!(deleted).document_id, created.document_id);
    assert_none!(store.find_one(&created.document_id).await.unwrap());
    assert_none!(store.delete(&created.document_id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn subscription_flow_works_against_postgres() {
    let test_app = TestApp::spawn_app_with_postgres().await;

    let first = test_app
        .post_subscription(json!({ "email": "pg@test.com", "fullname": "Frank" }))
        .await;
    assert_eq!(200, first.status().as_u16());

    test_app
        .post_unsubscription(json!({ "email": "pg@test.com" }))
        .await;
    let response = test_app
        .post_subscription(json!({ "email": "pg@test.com" }))
        .await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Successfully reactivated your subscription!"
    );
    let subscriber = test_app.find_subscriber("pg@test.com").await.unwrap();
    assert_eq!(subscriber.fullname.as_ref(), "Frank");
    assert!(subscriber.is_active);
}
