use calendar_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::services::feed::FeedService,
    infra::cache::moka_occurrence_cache::MokaOccurrenceCache,
    infra::repositories::{
        sqlite_category_repo::SqliteCategoryRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_exception_repo::SqliteExceptionRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::Request,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            cache_ttl_secs: 3600,
            page_size: 12,
            feed_window_months: 6,
        };

        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let exception_repo = Arc::new(SqliteExceptionRepo::new(pool.clone()));
        let category_repo = Arc::new(SqliteCategoryRepo::new(pool.clone()));
        let occurrence_cache = Arc::new(MokaOccurrenceCache::new(config.cache_ttl_secs));
        let feed_service = Arc::new(FeedService::new(
            event_repo.clone(),
            exception_repo.clone(),
            category_repo.clone(),
            occurrence_cache.clone(),
            &config,
        ));

        let state = Arc::new(AppState {
            config,
            event_repo,
            exception_repo,
            category_repo,
            occurrence_cache,
            feed_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn post_json(&self, uri: &str, payload: &Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn put_json(&self, uri: &str, payload: &Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    pub async fn delete(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
