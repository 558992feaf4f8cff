mod common;

use common::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn create_chirp_requires_access_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/chirps"))
        .json(&json!({ "body": "hello" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    let response = app.create_chirp("not-a-jwt", "hello").await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn create_chirp_rejects_refresh_token() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let response = app.create_chirp(&session.refresh_token, "hello").await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn create_chirp_cleans_profanity() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let response = app
        .create_chirp(&session.token, "This is a kerfuffle opinion I need to share with the world")
        .await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["body"],
        "This is a **** opinion I need to share with the world"
    );
    assert_eq!(body["user_id"], session.id.as_str());
}

#[tokio::test]
async fn create_chirp_rejects_long_body() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let response = app.create_chirp(&session.token, &"a".repeat(141)).await;
    assert_eq!(400, response.status().as_u16());

    let response = app.create_chirp(&session.token, &"a".repeat(140)).await;
    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn list_chirps_filters_and_sorts() {
    let app = spawn_app().await;
    let alice = app.signed_up("alice@x.com", "secret1").await;
    let bob = app.signed_up("bob@x.com", "secret1").await;

    for body in ["first", "second"] {
        let response = app.create_chirp(&alice.token, body).await;
        assert_eq!(201, response.status().as_u16());
    }
    app.create_chirp(&bob.token, "from bob").await;

    let all: Vec<Value> = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let mine: Vec<Value> = app
        .client
        .get(app.url(&format!("/api/chirps?author_id={}", alice.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0]["body"], "first");
    assert_eq!(mine[1]["body"], "second");

    let reversed: Vec<Value> = app
        .client
        .get(app.url(&format!("/api/chirps?author_id={}&sort=desc", alice.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reversed[0]["body"], "second");
    assert_eq!(reversed[1]["body"], "first");
}

#[tokio::test]
async fn list_chirps_rejects_bad_author_id() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/chirps?author_id=nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn get_chirp_by_id() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let created: Value = app.create_chirp(&session.token, "hello").await.json().await.unwrap();
    let chirp_id = created["id"].as_str().unwrap();

    let response = app
        .client
        .get(app.url(&format!("/api/chirps/{}", chirp_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["body"], "hello");

    let response = app
        .client
        .get(app.url(&format!("/api/chirps/{}", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());

    let response = app
        .client
        .get(app.url("/api/chirps/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn delete_chirp_of_another_user_is_forbidden() {
    let app = spawn_app().await;
    let alice = app.signed_up("alice@x.com", "secret1").await;
    let bob = app.signed_up("bob@x.com", "secret1").await;

    let created: Value = app.create_chirp(&alice.token, "mine").await.json().await.unwrap();
    let path = format!("/api/chirps/{}", created["id"].as_str().unwrap());

    let response = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&bob.token)
        .send()
        .await
        .unwrap();
    assert_eq!(403, response.status().as_u16());

    let response = app.client.get(app.url(&path)).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn delete_own_chirp() {
    let app = spawn_app().await;
    let session = app.signed_up("a@x.com", "secret1").await;

    let created: Value = app.create_chirp(&session.token, "bye").await.json().await.unwrap();
    let path = format!("/api/chirps/{}", created["id"].as_str().unwrap());

    let response = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(401, response.status().as_u16());

    let response = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(204, response.status().as_u16());

    let response = app.client.get(app.url(&path)).send().await.unwrap();
    assert_eq!(404, response.status().as_u16());

    let response = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());
}
