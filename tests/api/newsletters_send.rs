use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
async fn sending_a_published_newsletter_records_one_send_per_active_subscriber() {
    let test_app = TestApp::spawn_app().await;
    let newsletter_id = test_app.seed_newsletter(true, false).await;

    test_app.seed_subscriber("free", true).await;
    test_app.seed_subscriber("pro", true).await;
    test_app.seed_subscriber("free", true).await;
    test_app.seed_subscriber("pro", false).await;

    let response = test_app
        .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Newsletter sent successfully");
    assert_eq!(body["sentCount"], 3);
    assert_eq!(body["newsletterTitle"], "Weekly AI digest");
    assert_eq!(test_app.sent_subscriber_ids(newsletter_id).await.len(), 3);
}

#[tokio::test]
async fn premium_newsletters_are_only_sent_to_pro_subscribers() {
    let test_app = TestApp::spawn_app().await;
    let newsletter_id = test_app.seed_newsletter(true, true).await;
    let mut pro_ids = Vec::new();

    for _ in 0..3 {
        pro_ids.push(test_app.seed_subscriber("pro", true).await.id);
    }
    for _ in 0..2 {
        test_app.seed_subscriber("free", true).await;
    }

    let response = test_app
        .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["sentCount"], 3);

    let mut sent_ids = test_app.sent_subscriber_ids(newsletter_id).await;
    sent_ids.sort();
    pro_ids.sort();
    assert_eq!(sent_ids, pro_ids);
}

#[tokio::test]
async fn premium_newsletter_without_pro_subscribers_is_rejected() {
    let test_app = TestApp::spawn_app().await;
    let newsletter_id = test_app.seed_newsletter(true, true).await;

    test_app.seed_subscriber("free", true).await;
    test_app.seed_subscriber("free", true).await;

    let response = test_app
        .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "No pro subscribers found for this premium newsletter"
    );
    assert!(test_app.sent_subscriber_ids(newsletter_id).await.is_empty());
}

#[tokio::test]
async fn unpublished_newsletters_are_not_sent() {
    let test_app = TestApp::spawn_app().await;
    let newsletter_id = test_app.seed_newsletter(false, false).await;

    test_app.seed_subscriber("free", true).await;

    let response = test_app
        .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Newsletter must be published first");
    assert!(test_app.sent_subscriber_ids(newsletter_id).await.is_empty());
}

#[tokio::test]
async fn sending_without_active_subscribers_is_rejected() {
    let test_app = TestApp::spawn_app().await;
    let newsletter_id = test_app.seed_newsletter(true, false).await;

    test_app.seed_subscriber("pro", false).await;

    let response = test_app
        .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No active subscribers found");
}

#[tokio::test]
async fn sending_twice_records_the_sends_twice() {
    let test_app = TestApp::spawn_app().await;
    let newsletter_id = test_app.seed_newsletter(true, false).await;

    test_app.seed_subscriber("free", true).await;

    for _ in 0..2 {
        let response = test_app
            .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
            .await;
        assert_eq!(200, response.status().as_u16());
    }

    assert_eq!(test_app.sent_subscriber_ids(newsletter_id).await.len(), 2);
}

#[tokio::test]
async fn unknown_newsletters_return_404() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({ "newsletterId": Uuid::new_v4() }), "unknown id"),
        (serde_json::json!({ "newsletterId": "not-a-uuid" }), "malformed id"),
    ];

    for (body, description) in test_cases {
        let response = test_app.post_send_newsletter(&body).await;

        assert_eq!(
            404,
            response.status().as_u16(),
            "The API did not fail with 404 status for {}",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Newsletter not found");
    }
}

#[tokio::test]
async fn sending_without_newsletter_id_returns_400() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_send_newsletter(&serde_json::json!({})).await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Newsletter ID is required");
}

#[tokio::test]
async fn failing_to_record_sends_still_reports_a_successful_send() {
    let test_app = TestApp::spawn_app().await;
    let newsletter_id = test_app.seed_newsletter(true, false).await;

    test_app.seed_subscriber("free", true).await;
    test_app.seed_subscriber("pro", true).await;

    // Every insert into newsletter_sends is rejected from now on
    sqlx::query("ALTER TABLE newsletter_sends ADD CONSTRAINT reject_all_sends CHECK (false)")
        .execute(&test_app.db_pool)
        .await
        .expect("Failed to break the newsletter_sends table.");

    let response = test_app
        .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Newsletter sent successfully");
    assert_eq!(body["sentCount"], 2);
    assert!(test_app.sent_subscriber_ids(newsletter_id).await.is_empty());
}
