use reqwest::Method;
use uuid::Uuid;

use crate::helpers::{TestApp, TestUser};

async fn create_newsletter(
    test_app: &TestApp,
    user: &TestUser,
    body: serde_json::Value,
) -> reqwest::Response {
    test_app
        .dashboard_request(Method::POST, "/dashboard/newsletters", user)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.")
}

async fn toggle_publish(test_app: &TestApp, user: &TestUser, id: &str) -> serde_json::Value {
    let response = test_app
        .dashboard_request(
            Method::POST,
            &format!("/dashboard/newsletters/{}/publish", id),
            user,
        )
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    response.json().await.unwrap()
}

#[tokio::test]
async fn newsletters_are_created_as_drafts_by_default() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    let response = create_newsletter(
        &test_app,
        &user,
        serde_json::json!({ "title": "Weekly digest", "content": "<p>Hi</p>", "excerpt": "Hi" }),
    )
    .await;

    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let newsletter = &body["newsletter"];
    assert_eq!(newsletter["title"], "Weekly digest");
    assert_eq!(newsletter["is_published"], false);
    assert_eq!(newsletter["is_premium"], false);
    assert!(newsletter["published_at"].is_null());
    assert_eq!(newsletter["view_count"], 0);
    assert_eq!(newsletter["author_id"], user.id.to_string().as_str());
}

#[tokio::test]
async fn newsletters_saved_with_publish_are_stamped() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    let body: serde_json::Value = create_newsletter(
        &test_app,
        &user,
        serde_json::json!({
            "title": "Premium digest",
            "content": "<p>Hi</p>",
            "isPremium": true,
            "publish": true
        }),
    )
    .await
    .json()
    .await
    .unwrap();

    assert_eq!(body["newsletter"]["is_published"], true);
    assert_eq!(body["newsletter"]["is_premium"], true);
    assert!(body["newsletter"]["published_at"].is_string());
}

#[tokio::test]
async fn newsletters_with_invalid_body_are_rejected() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;
    let test_cases = vec![
        (serde_json::json!({ "content": "<p>Hi</p>" }), "missing title"),
        (serde_json::json!({ "title": "Weekly digest" }), "missing content"),
        (serde_json::json!({ "title": "  ", "content": "<p>Hi</p>" }), "blank title"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = create_newsletter(&test_app, &user, invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn publish_toggle_sets_and_clears_the_publication_date() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;
    let newsletter_id = test_app.seed_newsletter(false, false).await.to_string();

    let published = toggle_publish(&test_app, &user, &newsletter_id).await;
    assert_eq!(published["newsletter"]["is_published"], true);
    assert!(published["newsletter"]["published_at"].is_string());

    let unpublished = toggle_publish(&test_app, &user, &newsletter_id).await;
    assert_eq!(unpublished["newsletter"]["is_published"], false);
    assert!(unpublished["newsletter"]["published_at"].is_null());
}

#[tokio::test]
async fn toggling_an_unknown_newsletter_returns_404() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    let response = test_app
        .dashboard_request(
            Method::POST,
            &format!("/dashboard/newsletters/{}/publish", Uuid::new_v4()),
            &user,
        )
        .send()
        .await
        .unwrap();

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn authors_can_update_their_newsletters() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;
    let created: serde_json::Value = create_newsletter(
        &test_app,
        &user,
        serde_json::json!({ "title": "Draft", "content": "<p>Hi</p>" }),
    )
    .await
    .json()
    .await
    .unwrap();
    let newsletter_id = created["newsletter"]["id"].as_str().unwrap();

    let response = test_app
        .dashboard_request(
            Method::PUT,
            &format!("/dashboard/newsletters/{}", newsletter_id),
            &user,
        )
        .json(&serde_json::json!({ "title": "Final", "content": "<p>Bye</p>", "publish": true }))
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["newsletter"]["title"], "Final");
    assert_eq!(body["newsletter"]["is_published"], true);
}

#[tokio::test]
async fn newsletters_of_other_authors_cannot_be_updated() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;
    let newsletter_id = test_app.seed_newsletter(false, false).await;

    let response = test_app
        .dashboard_request(
            Method::PUT,
            &format!("/dashboard/newsletters/{}", newsletter_id),
            &user,
        )
        .json(&serde_json::json!({ "title": "Hijacked", "content": "<p>Hi</p>" }))
        .send()
        .await
        .unwrap();

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn deleting_a_newsletter_keeps_its_send_records() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;
    let newsletter_id = test_app.seed_newsletter(true, false).await;
    test_app.seed_subscriber("free", true).await;

    test_app
        .post_send_newsletter(&serde_json::json!({ "newsletterId": newsletter_id }))
        .await;

    let path = format!("/dashboard/newsletters/{}", newsletter_id);
    let response = test_app
        .dashboard_request(Method::DELETE, &path, &user)
        .send()
        .await
        .unwrap();
    assert_eq!(204, response.status().as_u16());

    let response = test_app.dashboard_get(&path, &user).await;
    assert_eq!(404, response.status().as_u16());

    assert_eq!(test_app.sent_subscriber_ids(newsletter_id).await.len(), 1);
}

#[tokio::test]
async fn newsletters_are_listed_newest_first() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    for title in ["First", "Second"] {
        create_newsletter(
            &test_app,
            &user,
            serde_json::json!({ "title": title, "content": "<p>Hi</p>" }),
        )
        .await;
    }

    let body: serde_json::Value = test_app
        .dashboard_get("/dashboard/newsletters", &user)
        .await
        .json()
        .await
        .unwrap();
    let newsletters = body["newsletters"].as_array().unwrap();

    assert_eq!(newsletters.len(), 2);
    assert_eq!(newsletters[0]["title"], "Second");
    assert_eq!(newsletters[1]["title"], "First");
}
