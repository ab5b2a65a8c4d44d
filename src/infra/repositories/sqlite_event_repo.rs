use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (id, slug, title, body, start_date, start_time, end_date, end_time, all_day, frequency, repeat_interval, repeat_until, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.slug)
            .bind(&event.title)
            .bind(&event.body)
            .bind(event.start_date)
            .bind(event.start_time)
            .bind(event.end_date)
            .bind(event.end_time)
            .bind(event.all_day)
            .bind(&event.frequency)
            .bind(event.repeat_interval)
            .bind(event.repeat_until)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY start_date, slug")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET slug = ?, title = ?, body = ?, start_date = ?, start_time = ?, end_date = ?, end_time = ?, all_day = ?, frequency = ?, repeat_interval = ?, repeat_until = ?, updated_at = ?
               WHERE id = ?
               RETURNING *"#
        )
            .bind(&event.slug)
            .bind(&event.title)
            .bind(&event.body)
            .bind(event.start_date)
            .bind(event.start_time)
            .bind(event.end_date)
            .bind(event.end_time)
            .bind(event.all_day)
            .bind(&event.frequency)
            .bind(event.repeat_interval)
            .bind(event.repeat_until)
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}
