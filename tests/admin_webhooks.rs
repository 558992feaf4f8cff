mod common;

use common::{spawn_app, spawn_app_on, POLKA_KEY};
use serde_json::{json, Value};

fn upgrade_event(user_id: &str) -> Value {
    json!({ "event": "user.upgraded", "data": { "user_id": user_id } })
}

// --- Polka webhook ---

#[tokio::test]
async fn webhook_requires_api_key() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .json(&upgrade_event(&session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());

    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .header("Authorization", "ApiKey wrong-key")
        .json(&upgrade_event(&session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());

    // The key must be presented with the ApiKey scheme.
    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .bearer_auth(POLKA_KEY)
        .json(&upgrade_event(&session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn webhook_ignores_other_events() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .header("Authorization", format!("ApiKey {}", POLKA_KEY))
        .json(&json!({ "event": "user.payment_failed", "data": { "user_id": session.id } }))
        .send()
        .await
        .unwrap();
    assert_eq!(204, response.status().as_u16());

    let body: Value = app.login("a@x.com", "secret1").await.json().await.unwrap();
    assert_eq!(body["is_chirpy_red"], false);
}

#[tokio::test]
async fn webhook_unknown_user_returns_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .header("Authorization", format!("ApiKey {}", POLKA_KEY))
        .json(&upgrade_event(&uuid::Uuid::new_v4().to_string()))
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn webhook_upgrades_user() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .header("Authorization", format!("ApiKey {}", POLKA_KEY))
        .json(&upgrade_event(&session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(204, response.status().as_u16());

    let body: Value = app.login("a@x.com", "secret1").await.json().await.unwrap();
    assert_eq!(body["is_chirpy_red"], true);
}

// --- Admin ---

#[tokio::test]
async fn reset_clears_users_in_dev() {
    let app = spawn_app().await;
    app.signed_up("a@x.com", "secret1").await;

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());

    assert_eq!(401, app.login("a@x.com", "secret1").await.status().as_u16());
}

#[tokio::test]
async fn reset_is_forbidden_outside_dev() {
    let app = spawn_app_on("prod").await;
    app.signed_up("a@x.com", "secret1").await;

    let response = app.client.post(app.url("/admin/reset")).send().await.unwrap();
    assert_eq!(403, response.status().as_u16());

    assert_eq!(200, app.login("a@x.com", "secret1").await.status().as_u16());
}

#[tokio::test]
async fn metrics_count_file_server_hits() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/app/")).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());

    // API traffic is not counted.
    app.client.get(app.url("/api/healthz")).send().await.unwrap();

    let response = app.client.get(app.url("/admin/metrics")).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());
    let html = response.text().await.unwrap();
    assert!(html.contains("Chirpy has been visited 1 times!"));
}
