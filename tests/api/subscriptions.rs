use fake::{faker::internet::en::SafeEmail, Fake};
use serde_json::json;

use crate::helpers::{FailingStore, TestApp};

#[tokio::test]
async fn subscribe_returns_200_for_a_new_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_subscription(json!({ "email": "new@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "message": "Successfully subscribed to newsletter!",
            "data": { "email": "new@test.com", "isActive": true }
        })
    );
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscription(json!({ "email": "test@test.com", "fullname": "Test" }))
        .await;

    let subscriber = test_app
        .find_subscriber("test@test.com")
        .await
        .expect("Subscriber was not stored.");
    assert_eq!(subscriber.email.as_ref(), "test@test.com");
    assert_eq!(subscriber.fullname.as_ref(), "Test");
    assert!(subscriber.is_active);
}

#[tokio::test]
async fn subscribe_defaults_fullname_to_anonymous() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscription(json!({ "email": "anon@test.com", "fullname": "" }))
        .await;

    let subscriber = test_app.find_subscriber("anon@test.com").await.unwrap();
    assert_eq!(subscriber.fullname.as_ref(), "Anonymous");
}

#[tokio::test]
async fn subscribing_twice_reports_already_subscribed_without_changes() {
    let test_app = TestApp::spawn_app().await;
    let email: String = SafeEmail().fake();

    test_app
        .post_subscription(json!({ "email": email, "fullname": "Frank" }))
        .await;
    let before = test_app.find_subscriber(&email).await.unwrap();

    let response = test_app
        .post_subscription(json!({ "email": email, "fullname": "Someone else" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "You are already subscribed to our newsletter!"
    );
    assert_eq!(body["data"]["isActive"], true);

    let after = test_app.find_subscriber(&email).await.unwrap();
    assert_eq!(after.fullname.as_ref(), "Frank");
    assert_eq!(after.subscribed_at, before.subscribed_at);
}

#[tokio::test]
async fn inactive_subscriber_is_reactivated() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .post_subscription(json!({ "email": "a@b.com", "fullname": "Old" }))
        .await;
    test_app
        .post_unsubscription(json!({ "email": "a@b.com" }))
        .await;
    assert!(!test_app.find_subscriber("a@b.com").await.unwrap().is_active);

    let response = test_app
        .post_subscription(json!({ "email": "a@b.com", "fullname": "X" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Successfully reactivated your subscription!"
    );
    assert_eq!(body["data"]["isActive"], true);

    let subscriber = test_app.find_subscriber("a@b.com").await.unwrap();
    assert!(subscriber.is_active);
    assert_eq!(subscriber.fullname.as_ref(), "X");
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_missing() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (json!({}), "missing body parameters"),
        (json!({ "fullname": "Frank" }), "missing email parameter"),
        (json!({ "email": "" }), "empty email parameter"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"]["message"], "Email is required");
    }
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_malformed() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        ("test.com", "missing @"),
        ("frank@test", "missing dot in domain"),
        ("@test.com", "missing local part"),
        ("fr ank@test.com", "whitespace"),
        ("frank@te@st.com", "two @"),
    ];

    for (email, error_message) in test_cases {
        let response = test_app.post_subscription(json!({ "email": email })).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when email was {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"]["message"], "Invalid email format");
        assert_eq!(body["error"]["name"], "BadRequestError");
    }
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_not_an_ascii_string() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (json!("jöhn@exämple.com"), "non-ascii characters"),
        (json!(5), "a number"),
        (json!(true), "a boolean"),
        (json!(["frank@test.com"]), "an array"),
    ];

    for (email, error_message) in test_cases {
        let response = test_app.post_subscription(json!({ "email": email })).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when email was {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"]["message"], "Invalid email format");
        assert_eq!(body["error"]["name"], "BadRequestError");
    }
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_not_json() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .client
        .post(&format!("{}/subscribe", test_app.address))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn subscribe_returns_500_with_a_generic_message_when_the_store_fails() {
    let test_app = TestApp::spawn_app_with_stores(FailingStore::stores()).await;

    let response = test_app
        .post_subscription(json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"]["message"],
        "Failed to process subscription. Please try again later."
    );
}

#[tokio::test]
async fn unsubscribe_deactivates_the_subscriber() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .post_subscription(json!({ "email": "frank@test.com" }))
        .await;

    let response = test_app
        .post_unsubscription(json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "message": "Successfully unsubscribed from newsletter.",
            "data": { "email": "frank@test.com", "isActive": false }
        })
    );
}

#[tokio::test]
async fn unsubscribe_returns_404_for_unknown_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_unsubscription(json!({ "email": "ghost@test.com" }))
        .await;

    assert_eq!(404, response.status().as_u16());
}
