use serde_json::json;

use crate::helpers::{FailingStore, TestApp};

async fn create_draft(test_app: &TestApp) -> String {
    let created = test_app
        .create_newsletter(json!({ "title": "Weekly" }))
        .await;

    created["documentId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn sending_a_newsletter_sets_sent_at() {
    let test_app = TestApp::spawn_app().await;
    let document_id = create_draft(&test_app).await;

    let response = test_app
        .patch_newsletter_status(&document_id, json!({ "status": "sent" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Status updated successfully");
    assert_eq!(body["data"]["documentId"], document_id.as_str());
    assert_eq!(body["data"]["docStatus"], "sent");
    assert!(body["data"]["sentAt"].is_string());
    assert!(body["data"]["id"].is_number());
}

#[tokio::test]
async fn reverting_to_draft_clears_sent_at() {
    let test_app = TestApp::spawn_app().await;
    let document_id = create_draft(&test_app).await;
    test_app
        .patch_newsletter_status(&document_id, json!({ "status": "sent" }))
        .await;

    let response = test_app
        .patch_newsletter_status(&document_id, json!({ "status": "draft" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["docStatus"], "draft");
    assert_eq!(body["data"]["sentAt"], serde_json::Value::Null);

    let stored: serde_json::Value = test_app
        .get_newsletter(&document_id)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stored["data"]["sentAt"], serde_json::Value::Null);
}

#[tokio::test]
async fn status_update_returns_404_for_unknown_newsletter() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .patch_newsletter_status("doesnotexist", json!({ "status": "sent" }))
        .await;

    assert_eq!(404, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["message"], "Newsletter not found");
}

#[tokio::test]
async fn status_update_returns_400_for_invalid_status() {
    let test_app = TestApp::spawn_app().await;
    let document_id = create_draft(&test_app).await;
    let test_cases = vec![
        (json!({}), "missing status"),
        (json!({ "status": "published" }), "unknown status"),
        (json!({ "status": "SENT" }), "wrong case"),
        (json!({ "status": 5 }), "numeric status"),
        (json!({ "status": null }), "null status"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app
            .patch_newsletter_status(&document_id, invalid_body)
            .await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload had {}",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body["error"]["message"],
            r#"Invalid status. Must be either "draft" or "sent""#
        );
    }
}

#[tokio::test]
async fn status_update_returns_500_when_the_store_fails() {
    let test_app = TestApp::spawn_app_with_stores(FailingStore::stores()).await;

    let response = test_app
        .patch_newsletter_status("abc", json!({ "status": "sent" }))
        .await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["message"], "Failed to update status");
}
