//! Product endpoints under `/productos`.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use catalog_store::{
    BrandId, CatalogStore, CategoryId, Page, PageRequest, Product, ProductId, ProductSort,
    ProductSortField, SortDirection,
};
use chrono::{DateTime, Utc};
use common::DEFAULT_PAGE_SIZE;
use domain::{NewProduct, ProductPatch};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "imagenUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "categoriaId")]
    pub category_id: CategoryId,
    #[serde(rename = "categoriaNombre")]
    pub category_name: String,
    #[serde(rename = "marcaId")]
    pub brand_id: BrandId,
    #[serde(rename = "marcaNombre")]
    pub brand_name: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            code: product.code,
            image_url: product.image_url,
            created_at: product.created_at,
            active: product.active,
            category_id: product.category_id,
            category_name: product.category_name,
            brand_id: product.brand_id,
            brand_name: product.brand_name,
        }
    }
}

fn to_responses(products: Vec<Product>) -> Json<Vec<ProductResponse>> {
    Json(products.into_iter().map(ProductResponse::from).collect())
}

/// Query string of the paged listings: `page`, `size` and `sort=campo[,asc|desc]`.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(DEFAULT_PAGE_SIZE))
            .map_err(ApiError::BadRequest)
    }

    pub fn product_sort(&self) -> Result<ProductSort, ApiError> {
        let Some(raw) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(ProductSort::default());
        };

        let mut parts = raw.split(',').map(str::trim);
        let field = match parts.next().unwrap_or_default() {
            "id" => ProductSortField::Id,
            "nombre" => ProductSortField::Name,
            "precio" => ProductSortField::Price,
            "stock" => ProductSortField::Stock,
            "codigo" => ProductSortField::Code,
            "fechaCreacion" => ProductSortField::CreatedAt,
            other => return Err(ApiError::BadRequest(format!("Unknown sort field: '{other}'"))),
        };
        let direction = match parts.next() {
            Some(dir) => SortDirection::from_str(dir).map_err(ApiError::BadRequest)?,
            None => SortDirection::Asc,
        };
        if parts.next().is_some() {
            return Err(ApiError::BadRequest(format!("Invalid sort: '{raw}'")));
        }

        Ok(ProductSort::new(field, direction))
    }
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    #[serde(default)]
    pub nombre: String,
}

/// Prices arrive as strings so they parse straight into decimals.
#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LowStockParams {
    #[serde(rename = "stockMinimo")]
    pub threshold: Option<i32>,
}

fn parse_price(raw: Option<&str>, name: &str) -> Result<Decimal, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::BadRequest(format!("Missing parameter: '{name}'")))?;
    Decimal::from_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid {name}: '{raw}'")))
}

fn to_page(page: Page<Product>) -> Json<Page<ProductResponse>> {
    Json(page.map(ProductResponse::from))
}

/// GET /productos
#[tracing::instrument(skip(state))]
pub async fn list<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(state.products.list_all().await?))
}

/// GET /productos/pagina
#[tracing::instrument(skip(state))]
pub async fn list_paged<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<ProductResponse>>, ApiError> {
    let Query(params) = params?;
    let page = state
        .products
        .list_all_paged(params.page_request()?, params.product_sort()?)
        .await?;
    Ok(to_page(page))
}

/// GET /productos/activos
#[tracing::instrument(skip(state))]
pub async fn list_active<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(state.products.list_active().await?))
}

/// GET /productos/activos/pagina
#[tracing::instrument(skip(state))]
pub async fn list_active_paged<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<ProductResponse>>, ApiError> {
    let Query(params) = params?;
    let page = state
        .products
        .list_active_paged(params.page_request()?, params.product_sort()?)
        .await?;
    Ok(to_page(page))
}

/// GET /productos/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id: ProductId = parse_id(&id, "product id")?;
    Ok(Json(state.products.get(id).await?.into()))
}

/// GET /productos/codigo/{codigo}
#[tracing::instrument(skip(state))]
pub async fn get_by_code<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    Ok(Json(state.products.get_by_code(&code).await?.into()))
}

/// GET /productos/categoria/{categoria_id}
#[tracing::instrument(skip(state))]
pub async fn list_by_category<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let category_id: CategoryId = parse_id(&category_id, "category id")?;
    Ok(to_responses(
        state.products.list_by_category(category_id).await?,
    ))
}

/// GET /productos/marca/{marca_id}
#[tracing::instrument(skip(state))]
pub async fn list_by_brand<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(brand_id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let brand_id: BrandId = parse_id(&brand_id, "brand id")?;
    Ok(to_responses(state.products.list_by_brand(brand_id).await?))
}

/// GET /productos/categoria/{categoria_id}/marca/{marca_id}
#[tracing::instrument(skip(state))]
pub async fn list_by_category_and_brand<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path((category_id, brand_id)): Path<(String, String)>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let category_id: CategoryId = parse_id(&category_id, "category id")?;
    let brand_id: BrandId = parse_id(&brand_id, "brand id")?;
    let products = state
        .products
        .list_by_category_and_brand(category_id, brand_id)
        .await?;
    Ok(to_responses(products))
}

/// GET /productos/nombre?nombre=
#[tracing::instrument(skip(state))]
pub async fn list_by_name<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<NameParams>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let Query(params) = params?;
    Ok(to_responses(
        state.products.list_by_name_contains(&params.nombre).await?,
    ))
}

/// GET /productos/precio?min=&max=
#[tracing::instrument(skip(state))]
pub async fn list_by_price_range<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<PriceParams>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let Query(params) = params?;
    let min = parse_price(params.min.as_deref(), "min")?;
    let max = parse_price(params.max.as_deref(), "max")?;
    Ok(to_responses(
        state.products.list_by_price_range(min, max).await?,
    ))
}

/// GET /productos/stock-bajo?stockMinimo=
#[tracing::instrument(skip(state))]
pub async fn list_low_stock<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    params: Result<Query<LowStockParams>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let Query(params) = params?;
    let threshold = params
        .threshold
        .ok_or_else(|| ApiError::BadRequest("Missing parameter: 'stockMinimo'".into()))?;
    Ok(to_responses(
        state.products.list_by_low_stock(threshold).await?,
    ))
}

/// GET /productos/disponibles
#[tracing::instrument(skip(state))]
pub async fn list_available<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(to_responses(state.products.list_available().await?))
}

/// POST /productos
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(input) = payload?;
    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /productos/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id: ProductId = parse_id(&id, "product id")?;
    let Json(patch) = payload?;
    Ok(Json(state.products.update(id, patch).await?.into()))
}

/// DELETE /productos/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: CatalogStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ProductId = parse_id(&id, "product id")?;
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
