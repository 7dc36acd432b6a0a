#![allow(dead_code)]

use std::net::SocketAddr;

use catering_site::config::Config;
use catering_site::entities::setup_schema;
use catering_site::{create_app, AppState};
use reqwest::Client;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub db: DatabaseConnection,
    pub dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> T {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        assert!(
            response.status().is_success(),
            "GET {path} returned {}",
            response.status()
        );
        response.json::<T>().await.expect("Failed to parse response JSON")
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn put_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// POSTs and returns the created row, asserting `201 Created`.
    pub async fn create(&self, path: &str, body: Value) -> Value {
        let response = self.post_json(path, body).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED, "POST {path}");
        response.json().await.expect("Failed to parse response JSON")
    }
}

/// Fresh SQLite file with the schema applied.
pub async fn database(dir: &TempDir) -> DatabaseConnection {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("site.db").display());
    let mut options = ConnectOptions::new(url);
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open test database");
    setup_schema(&db).await.expect("Failed to create schema");
    db
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Like [`spawn_app`], letting the test swap parts of the state first.
pub async fn spawn_app_with<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut AppState),
{
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = database(&dir).await;

    let storage_dir = dir.path().join("storage");
    let error_pages_dir = dir.path().join("errors");
    std::fs::create_dir_all(&storage_dir).expect("Failed to create storage dir");
    std::fs::create_dir_all(&error_pages_dir).expect("Failed to create error pages dir");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
        storage_dir,
        error_pages_dir,
        seed_demo: false,
    };
    let mut state = AppState::new(db.clone(), config);
    configure(&mut state);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });

    TestApp {
        base_url: format!("http://{address}"),
        client: Client::new(),
        db,
        dir,
    }
}
