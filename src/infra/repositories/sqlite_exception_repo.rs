use crate::domain::{models::exception::EventException, ports::ExceptionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteExceptionRepo {
    pool: SqlitePool,
}

impl SqliteExceptionRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ExceptionRepository for SqliteExceptionRepo {
    async fn upsert(&self, exception: &EventException) -> Result<EventException, AppError> {
        sqlx::query_as::<_, EventException>(
            r#"INSERT INTO event_exceptions (id, event_id, instance_date, action, title, body, start_date, end_date, start_time, end_time, all_day, reason, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            "SELECT * FROM event_exceptions WHERE event_id = ? AND instance_date = ?"
        )
            .bind(event_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<EventException>, AppError> {
        sqlx::query_as::<_, EventException>(
            "SELECT * FROM event_exceptions WHERE event_id = ? ORDER BY instance_date"
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, event_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<EventException>, AppError> {
        sqlx::query_as::<_, EventException>(
            "SELECT * FROM event_exceptions WHERE event_id = ? AND instance_date >= ? AND instance_date <= ?"
        )
            .bind(event_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, event_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM event_exceptions WHERE event_id = ? AND instance_date = ?")
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
