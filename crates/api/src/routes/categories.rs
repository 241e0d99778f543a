//! Category endpoints under `/categorias`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog_store::{CatalogStore, Category, CategoryId};
use domain::{CategoryPatch, NewCategory};
use serde::Serialize;

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            active: category.active,
        }
    }
}

fn to_responses(categories: Vec<Category>) -> Json<Vec<CategoryResponse>> {
    Json(categories.into_iter().map(CategoryResponse::from).collect())
}

/// GET /categorias
#[tracing::instrument(skip(state))]
pub async fn list<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    Ok(to_responses(state.categories.list_all().await?))
}

/// GET /categorias/activas
#[tracing::instrument(skip(state))]
pub async fn list_active<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    Ok(to_responses(state.categories.list_active().await?))
}

/// GET /categorias/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let id: CategoryId = parse_id(&id, "category id")?;
    Ok(Json(state.categories.get(id).await?.into()))
}

/// GET /categorias/nombre/{nombre}
#[tracing::instrument(skip(state))]
pub async fn get_by_name<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    Ok(Json(state.categories.get_by_name(&name).await?.into()))
}

/// POST /categorias
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let Json(input) = payload?;
    let category = state.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PUT /categorias/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryPatch>, JsonRejection>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let id: CategoryId = parse_id(&id, "category id")?;
    let Json(patch) = payload?;
    Ok(Json(state.categories.update(id, patch).await?.into()))
}

/// DELETE /categorias/{id}: removes the category, or deactivates it if products reference it.
#[tracing::instrument(skip(state))]
pub async fn delete<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: CategoryId = parse_id(&id, "category id")?;
    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
