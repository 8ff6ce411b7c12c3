use reqwest::{header::LOCATION, Method};

use crate::helpers::{TestApp, TestUser};

fn assert_redirects_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get(LOCATION).unwrap(), location);
}

#[tokio::test]
async fn dashboard_routes_redirect_anonymous_users_to_login() {
    let test_app = TestApp::spawn_app().await;

    for path in [
        "/dashboard",
        "/dashboard/newsletters",
        "/dashboard/subscribers",
        "/dashboard/settings",
        "/dashboard/analytics",
    ] {
        let response = test_app.get(path).await;

        assert_redirects_to(&response, "/auth/login");
    }
}

#[tokio::test]
async fn unknown_sessions_are_redirected_to_login() {
    let test_app = TestApp::spawn_app().await;
    let user = TestUser {
        id: uuid::Uuid::new_v4(),
        email: String::from("ghost@test.com"),
        name: String::from("Ghost"),
        session_token: String::from("not-a-session"),
    };

    let response = test_app.dashboard_get("/dashboard", &user).await;

    assert_redirects_to(&response, "/auth/login");
}

#[tokio::test]
async fn sessions_rejected_by_the_auth_provider_are_redirected_to_login() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;
    // The provider forgets every token: the stored session no longer resolves to a user
    test_app.auth_server.reset().await;

    let response = test_app.dashboard_get("/dashboard", &user).await;

    assert_redirects_to(&response, "/auth/login");
}

#[tokio::test]
async fn first_dashboard_visit_creates_exactly_one_profile() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    for _ in 0..2 {
        let response = test_app.dashboard_get("/dashboard", &user).await;
        assert_eq!(200, response.status().as_u16());
    }

    let profiles = sqlx::query_as::<_, (String, Option<String>, String)>(
        "SELECT email, name, role FROM profiles WHERE id = $1",
    )
    .bind(user.id)
    .fetch_all(&test_app.db_pool)
    .await
    .unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].0, user.email);
    assert_eq!(profiles[0].1.as_deref(), Some(user.name.as_str()));
    assert_eq!(profiles[0].2, "subscriber");
}

#[tokio::test]
async fn dashboard_home_shows_profile_recent_newsletters_and_subscriber_count() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    for _ in 0..12 {
        test_app.seed_newsletter(false, false).await;
    }
    test_app.seed_subscriber("free", true).await;
    test_app.seed_subscriber("free", false).await;

    let body: serde_json::Value = test_app
        .dashboard_get("/dashboard", &user)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["profile"]["email"], user.email.as_str());
    assert_eq!(body["newsletters"].as_array().unwrap().len(), 10);
    assert_eq!(body["subscriberCount"], 1);
}

#[tokio::test]
async fn settings_only_update_the_profile_name() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    let response = test_app
        .dashboard_request(Method::PUT, "/dashboard/settings", &user)
        .json(&serde_json::json!({ "name": "Francisco", "role": "admin" }))
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Profile updated successfully!");
    assert_eq!(body["profile"]["name"], "Francisco");
    assert_eq!(body["profile"]["role"], "subscriber");

    let settings: serde_json::Value = test_app
        .dashboard_get("/dashboard/settings", &user)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(settings["profile"]["name"], "Francisco");
}

#[tokio::test]
async fn settings_keep_names_with_punctuation() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    let response = test_app
        .dashboard_request(Method::PUT, "/dashboard/settings", &user)
        .json(&serde_json::json!({ "name": "Frank (work)" }))
        .send()
        .await
        .unwrap();

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["profile"]["name"], "Frank (work)");
}

#[tokio::test]
async fn settings_reject_a_too_long_name() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    let response = test_app
        .dashboard_request(Method::PUT, "/dashboard/settings", &user)
        .json(&serde_json::json!({ "name": "a".repeat(257) }))
        .send()
        .await
        .unwrap();

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn analytics_returns_the_mock_figures() {
    let test_app = TestApp::spawn_app().await;
    let user = test_app.login().await;

    let body: serde_json::Value = test_app
        .dashboard_get("/dashboard/analytics", &user)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["totalSent"], 1250);
    assert_eq!(body["openRate"], 24.5);
    assert_eq!(body["clickRate"], 7.1);
}
