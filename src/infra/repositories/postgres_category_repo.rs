use std::collections::HashMap;

use crate::domain::{models::category::Category, ports::CategoryRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCategoryRepo {
    pool: PgPool,
}

impl PostgresCategoryRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepo {
    async fn create(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, slug) VALUES ($1, $2, $3) RETURNING *"
        )
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }
        Ok(())
    }

    async fn set_for_event(&self, event_id: &str, category_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM event_categories WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for category_id in category_ids {
            sqlx::query("INSERT INTO event_categories (event_id, category_id) VALUES ($1, $2)")
                .bind(event_id)
                .bind(category_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)
    }

    async fn list_for_event(&self, event_id: &str) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"SELECT c.* FROM categories c
               JOIN event_categories ec ON ec.category_id = c.id
               WHERE ec.event_id = $1
               ORDER BY c.name"#
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn ids_by_event(&self, event_ids: &[String]) -> Result<HashMap<String, Vec<String>>, AppError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT event_id, category_id FROM event_categories WHERE event_id = ANY($1)"
        )
            .bind(event_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (event_id, category_id) in rows {
            map.entry(event_id).or_default().push(category_id);
        }
        Ok(map)
    }
}
