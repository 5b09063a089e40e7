use crate::helpers::TestApp;

#[tokio::test]
async fn admin_menu_lists_both_panels() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .client
        .get(&format!("{}/admin/menu", test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();

    let links = body["data"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["to"], "/plugins/newsletter");
    assert_eq!(links[0]["icon"], "Mail");
    assert_eq!(
        links[0]["permissions"][0]["action"],
        "plugin::email.settings.read"
    );
    assert_eq!(links[1]["to"], "/plugins/ai-text-generation");
    assert_eq!(links[1]["intlLabel"]["defaultMessage"], "AI Text Generation");

    let plugins = body["meta"]["plugins"].as_array().unwrap();
    assert_eq!(plugins[0]["id"], "newsletter");
    assert_eq!(plugins[1]["name"], "AI Text Generation");
}
