//! Brand endpoints under `/marcas`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog_store::{Brand, BrandId, CatalogStore};
use domain::{BrandPatch, NewBrand};
use serde::Serialize;

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub id: BrandId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "paisOrigen")]
    pub country: Option<String>,
    #[serde(rename = "sitioWeb")]
    pub website: Option<String>,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl From<Brand> for BrandResponse {
    fn from(brand: Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name,
            country: brand.country,
            website: brand.website,
            active: brand.active,
        }
    }
}

fn to_responses(brands: Vec<Brand>) -> Json<Vec<BrandResponse>> {
    Json(brands.into_iter().map(BrandResponse::from).collect())
}

/// GET /marcas
#[tracing::instrument(skip(state))]
pub async fn list<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<BrandResponse>>, ApiError> {
    Ok(to_responses(state.brands.list_all().await?))
}

/// GET /marcas/activas
#[tracing::instrument(skip(state))]
pub async fn list_active<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<BrandResponse>>, ApiError> {
    Ok(to_responses(state.brands.list_active().await?))
}

/// GET /marcas/pais/{pais}
#[tracing::instrument(skip(state))]
pub async fn list_by_country<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(country): Path<String>,
) -> Result<Json<Vec<BrandResponse>>, ApiError> {
    Ok(to_responses(state.brands.list_by_country(&country).await?))
}

/// GET /marcas/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<BrandResponse>, ApiError> {
    let id: BrandId = parse_id(&id, "brand id")?;
    Ok(Json(state.brands.get(id).await?.into()))
}

/// GET /marcas/nombre/{nombre}
#[tracing::instrument(skip(state))]
pub async fn get_by_name<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
) -> Result<Json<BrandResponse>, ApiError> {
    Ok(Json(state.brands.get_by_name(&name).await?.into()))
}

/// POST /marcas
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewBrand>, JsonRejection>,
) -> Result<(StatusCode, Json<BrandResponse>), ApiError> {
    let Json(input) = payload?;
    let brand = state.brands.create(input).await?;
    Ok((StatusCode::CREATED, Json(brand.into())))
}

/// PUT /marcas/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<BrandPatch>, JsonRejection>,
) -> Result<Json<BrandResponse>, ApiError> {
    let id: BrandId = parse_id(&id, "brand id")?;
    let Json(patch) = payload?;
    Ok(Json(state.brands.update(id, patch).await?.into()))
}

/// DELETE /marcas/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: BrandId = parse_id(&id, "brand id")?;
    state.brands.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
