use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateCategoryRequest;
use crate::domain::models::category::Category;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError::Validation("Name and slug must not be empty".into()));
    }

    let category = Category::new(payload.name, payload.slug);
    let created = state.category_repo.create(&category).await?;
    info!("Created category: {}", created.slug);
    Ok(Json(created))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.category_repo.list().await?;
    Ok(Json(categories))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.category_repo.delete(&id).await?;
    info!("Deleted category: {}", id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
