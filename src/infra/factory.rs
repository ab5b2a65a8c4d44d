use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::feed::FeedService;
use crate::state::AppState;
use crate::infra::cache::moka_occurrence_cache::MokaOccurrenceCache;
use crate::infra::repositories::{
    postgres_category_repo::PostgresCategoryRepo, postgres_event_repo::PostgresEventRepo,
    postgres_exception_repo::PostgresExceptionRepo,
    sqlite_category_repo::SqliteCategoryRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_exception_repo::SqliteExceptionRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let occurrence_cache = Arc::new(MokaOccurrenceCache::new(config.cache_ttl_secs));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let event_repo = Arc::new(PostgresEventRepo::new(pool.clone()));
        let exception_repo = Arc::new(PostgresExceptionRepo::new(pool.clone()));
        let category_repo = Arc::new(PostgresCategoryRepo::new(pool.clone()));
        let feed_service = Arc::new(FeedService::new(
            event_repo.clone(),
            exception_repo.clone(),
            category_repo.clone(),
            occurrence_cache.clone(),
            config,
        ));

        AppState {
            config: config.clone(),
            event_repo,
            exception_repo,
            category_repo,
            occurrence_cache,
            feed_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let exception_repo = Arc::new(SqliteExceptionRepo::new(pool.clone()));
        let category_repo = Arc::new(SqliteCategoryRepo::new(pool.clone()));
        let feed_service = Arc::new(FeedService::new(
            event_repo.clone(),
            exception_repo.clone(),
            category_repo.clone(),
            occurrence_cache.clone(),
            config,
        ));

        AppState {
            config: config.clone(),
            event_repo,
            exception_repo,
            category_repo,
            occurrence_cache,
            feed_service,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
