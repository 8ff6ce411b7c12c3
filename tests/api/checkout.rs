use crate::helpers::TestApp;

#[tokio::test]
async fn create_checkout_returns_a_local_checkout_url() {
    let test_app = TestApp::spawn_app().await;
    let subscriber = test_app.seed_subscriber("free", true).await;

    let response = test_app
        .post_create_checkout(&serde_json::json!({ "email": subscriber.email, "tier": "pro" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let expected_url = format!(
        "{}/checkout?email={}&tier=pro",
        test_app.config.get_app_base_url(),
        subscriber.email.replace('@', "%40")
    );
    assert_eq!(body["url"], expected_url.as_str());
}

#[tokio::test]
async fn create_checkout_for_unknown_subscriber_returns_404() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_create_checkout(&serde_json::json!({ "email": "ghost@test.com", "tier": "pro" }))
        .await;

    assert_eq!(404, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Subscriber not found");
}

#[tokio::test]
async fn create_checkout_returns_400_when_fields_are_missing() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({ "tier": "pro" }), "missing email"),
        (serde_json::json!({ "email": "frank@test.com" }), "missing tier"),
        (serde_json::json!({ "email": "frank@test.com", "tier": "gold" }), "unknown tier"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_create_checkout(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload had {}",
            error_message
        );
    }
}

#[tokio::test]
async fn completing_a_checkout_does_not_change_the_subscriber_tier() {
    let test_app = TestApp::spawn_app().await;
    let subscriber = test_app.seed_subscriber("free", true).await;

    let response = test_app
        .post_complete_checkout(&serde_json::json!({ "email": subscriber.email, "tier": "pro" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Payment Successful!");
    assert_eq!(body["tier"], "pro");

    let tier: String = sqlx::query_scalar("SELECT subscription_tier FROM subscribers WHERE id = $1")
        .bind(subscriber.id)
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_eq!(tier, "free");
}
