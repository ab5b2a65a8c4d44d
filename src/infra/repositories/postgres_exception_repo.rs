use crate::domain::{models::exception::EventException, ports::ExceptionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresExceptionRepo {
    pool: PgPool,
}

impl PostgresExceptionRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ExceptionRepository for PostgresExceptionRepo {
    async fn upsert(&self, exception: &EventException) -> Result<EventException, AppError> {
        sqlx::query_as::<_, EventException>(
            r#"INSERT INTO event_exceptions (id, event_id, instance_date, action, title, body, start_date, end_date, start_time, end_time, all_day, reason, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               ON CONFLICT(event_id, instance_date) DO UPDATE SET
               action=excluded.action,
               title=excluded.title,
               body=excluded.body,
               start_date=excluded.start_date,
               end_date=excluded.end_date,
               start_time=excluded.start_time,
               end_time=excluded.end_time,
               all_day=excluded.all_day,
               reason=excluded.reason
               RETURNING *"#
        )
            .bind(&exception.id)
            .bind(&exception.event_id)
            .bind(exception.instance_date)
            .bind(&exception.action)
            .bind(&exception.title)
            .bind(&exception.body)
            .bind(exception.start_date)
            .bind(exception.end_date)
            .bind(exception.start_time)
            .bind(exception.end_time)
            .bind(exception.all_day)
            .bind(&exception.reason)
            .bind(exception.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_event_and_date(&self, event_id: &str, date: NaiveDate) -> Result<Option<EventException>, AppError> {
        sqlx::query_as::<_, EventException>(
            "SELECT * FROM event_exceptions WHERE event_id = $1 AND instance_date = $2"
        )
            .bind(event_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<EventException>, AppError> {
        sqlx::query_as::<_, EventException>(
            "SELECT * FROM event_exceptions WHERE event_id = $1 ORDER BY instance_date"
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, event_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<EventException>, AppError> {
        sqlx::query_as::<_, EventException>(
            "SELECT * FROM event_exceptions WHERE event_id = $1 AND instance_date >= $2 AND instance_date <= $3"
        )
            .bind(event_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, event_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM event_exceptions WHERE event_id = $1 AND instance_date = $2")
            .bind(event_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Exception not found".into()));
        }
        Ok(())
    }
}
