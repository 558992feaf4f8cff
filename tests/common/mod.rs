#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::{
    get_configuration, ApplicationSettings, AuthSettings, DatabaseSettings, Settings,
};
use chirpy::startup::run;
use chirpy::store::{MemoryStore, PgStore, Store};
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    /// Set when the app runs on Postgres.
    pub db_pool: Option<PgPool>,
    pub client: reqwest::Client,
}

pub struct LoggedIn {
    pub id: String,
    pub token: String,
    pub refresh_token: String,
}

pub fn test_settings(platform: &str) -> Settings {
    Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform: platform.to_string(),
        },
        database: None,
        auth: AuthSettings {
            jwt_secret: Some(JWT_SECRET.to_string()),
            polka_key: Some(POLKA_KEY.to_string()),
            ..AuthSettings::default()
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on("dev").await
}

pub async fn spawn_app_on(platform: &str) -> TestApp {
    spawn_with_store(Arc::new(MemoryStore::new()), None, platform)
}

/// Spawn the app on a fresh Postgres database
///
/// Database settings come from the usual configuration sources
/// (`APP_DATABASE__HOST` and friends). Returns `None` when none are set.
pub async fn spawn_app_pg() -> Option<TestApp> {
    let mut database = database_settings()?;
    database.database_name = uuid::Uuid::new_v4().to_string();
    let pool = configure_database(&database).await;

    Some(spawn_with_store(
        Arc::new(PgStore::new(pool.clone())),
        Some(pool),
        "dev",
    ))
}

pub fn database_settings() -> Option<DatabaseSettings> {
    let database = get_configuration().ok().and_then(|c| c.database);
    if database.is_none() {
        eprintln!("No database configured, skipping Postgres test");
    }
    database
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");
    // Migrate database
    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

fn spawn_with_store(store: Arc<dyn Store>, db_pool: Option<PgPool>, platform: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = run(listener, store, test_settings(platform)).expect("Failed to start server");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register and log in, returning the issued credentials
    pub async fn signed_up(&self, email: &str, password: &str) -> LoggedIn {
        let created = self.create_user(email, password).await;
        assert_eq!(201, created.status().as_u16());

        let response = self.login(email, password).await;
        assert_eq!(200, response.status().as_u16());
        let body: Value = response.json().await.expect("Failed to parse response");

        LoggedIn {
            id: body["id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
