//! HTTP API for the computer-store catalog.
//!
//! Exposes category, brand and product endpoints over a shared
//! [`CatalogStore`], with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use catalog_store::CatalogStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{AppState, brands, categories, products};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CatalogStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/categorias",
            get(categories::list::<S>).post(categories::create::<S>),
        )
        .route("/categorias/activas", get(categories::list_active::<S>))
        .route(
            "/categorias/nombre/{nombre}",
            get(categories::get_by_name::<S>),
        )
        .route(
            "/categorias/{id}",
            get(categories::get::<S>)
                .put(categories::update::<S>)
                .delete(categories::delete::<S>),
        )
        .route("/marcas", get(brands::list::<S>).post(brands::create::<S>))
        .route("/marcas/activas", get(brands::list_active::<S>))
        .route("/marcas/pais/{pais}", get(brands::list_by_country::<S>))
        .route("/marcas/nombre/{nombre}", get(brands::get_by_name::<S>))
        .route(
            "/marcas/{id}",
            get(brands::get::<S>)
                .put(brands::update::<S>)
                .delete(brands::delete::<S>),
        )
        .route(
            "/productos",
            get(products::list::<S>).post(products::create::<S>),
        )
        .route("/productos/pagina", get(products::list_paged::<S>))
        .route("/productos/activos", get(products::list_active::<S>))
        .route(
            "/productos/activos/pagina",
            get(products::list_active_paged::<S>),
        )
        .route("/productos/codigo/{codigo}", get(products::get_by_code::<S>))
        .route(
            "/productos/categoria/{categoria_id}",
            get(products::list_by_category::<S>),
        )
        .route(
            "/productos/categoria/{categoria_id}/marca/{marca_id}",
            get(products::list_by_category_and_brand::<S>),
        )
        .route(
            "/productos/marca/{marca_id}",
            get(products::list_by_brand::<S>),
        )
        .route("/productos/nombre", get(products::list_by_name::<S>))
        .route("/productos/precio", get(products::list_by_price_range::<S>))
        .route("/productos/stock-bajo", get(products::list_low_stock::<S>))
        .route("/productos/disponibles", get(products::list_available::<S>))
        .route(
            "/productos/{id}",
            get(products::get::<S>)
                .put(products::update::<S>)
                .delete(products::delete::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over the given store.
pub fn create_state<S: CatalogStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
