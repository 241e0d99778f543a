//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p catalog-store --test postgres_integration
//! ```

use std::sync::Arc;

use catalog_store::{
    BrandFields, BrandId, CatalogStore, CatalogStoreExt, CategoryFields, CategoryId, Owner,
    PageRequest, PostgresCatalogStore, ProductFields, ProductQuery, ProductSort,
    ProductSortField, SortDirection, StoreError, constraints,
};
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_catalog_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresCatalogStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE products, categories, brands RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PostgresCatalogStore::new(pool)
}

fn category(name: &str) -> CategoryFields {
    CategoryFields {
        name: name.to_string(),
        description: Some(format!("{name} section")),
        active: true,
    }
}

fn brand(name: &str, country: &str) -> BrandFields {
    BrandFields {
        name: name.to_string(),
        country: Some(country.to_string()),
        website: None,
        active: true,
    }
}

fn product(name: &str, code: &str, category_id: CategoryId, brand_id: BrandId) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        description: None,
        price: dec!(999.99),
        stock: 5,
        code: code.to_string(),
        image_url: None,
        active: true,
        category_id,
        brand_id,
    }
}

#[tokio::test]
#[serial]
async fn insert_and_find_category() {
    let store = get_test_store().await;

    let created = store.insert_category(category("Laptops")).await.unwrap();
    let found = store.find_category(created.id).await.unwrap();

    assert_eq!(found, Some(created.clone()));
    assert_eq!(
        store.find_category_by_name("Laptops").await.unwrap(),
        Some(created)
    );
    assert!(store.find_category(CategoryId::new(9999)).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn duplicate_names_report_their_constraint() {
    let store = get_test_store().await;
    store.insert_category(category("Laptops")).await.unwrap();
    store.insert_brand(brand("Lenovo", "China")).await.unwrap();

    let err = store.insert_category(category("Laptops")).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));
    assert_eq!(err.constraint(), Some(constraints::CATEGORY_NAME_UNIQUE));

    let err = store.insert_brand(brand("Lenovo", "USA")).await.unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::BRAND_NAME_UNIQUE));
}

#[tokio::test]
#[serial]
async fn list_categories_filters_inactive() {
    let store = get_test_store().await;
    store.insert_category(category("Laptops")).await.unwrap();
    let mut hidden = category("Retired");
    hidden.active = false;
    store.insert_category(hidden).await.unwrap();

    assert_eq!(store.list_categories(false).await.unwrap().len(), 2);
    let active = store.list_categories(true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Laptops");
}

#[tokio::test]
#[serial]
async fn update_brand_overwrites_columns() {
    let store = get_test_store().await;
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();

    let mut fields = lenovo.fields();
    fields.website = Some("https://lenovo.com".to_string());
    fields.active = false;
    let updated = store.update_brand(lenovo.id, fields).await.unwrap().unwrap();

    assert_eq!(updated.website.as_deref(), Some("https://lenovo.com"));
    assert!(!updated.active);
    assert!(
        store
            .update_brand(BrandId::new(9999), brand("Ghost", "Nowhere"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
async fn brands_by_country() {
    let store = get_test_store().await;
    store.insert_brand(brand("Lenovo", "China")).await.unwrap();
    store.insert_brand(brand("Dell", "USA")).await.unwrap();
    store.insert_brand(brand("HP", "USA")).await.unwrap();

    let usa = store.list_brands_by_country("USA").await.unwrap();
    let names: Vec<_> = usa.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Dell", "HP"]);
}

#[tokio::test]
#[serial]
async fn product_round_trip_carries_owner_names() {
    let store = get_test_store().await;
    let laptops = store.insert_category(category("Laptops")).await.unwrap();
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();
    let created_at = Utc::now() - Duration::days(1);

    let created = store
        .insert_product(product("ThinkPad", "P1", laptops.id, lenovo.id), created_at)
        .await
        .unwrap();

    assert_eq!(created.category_name, "Laptops");
    assert_eq!(created.brand_name, "Lenovo");
    assert_eq!(created.price, dec!(999.99));

    let found = store.find_product_by_code("P1").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(
        found.created_at.timestamp_micros(),
        created_at.timestamp_micros()
    );
}

#[tokio::test]
#[serial]
async fn product_with_missing_owner_is_rejected() {
    let store = get_test_store().await;
    let laptops = store.insert_category(category("Laptops")).await.unwrap();
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();

    let err = store
        .insert_product(
            product("Ghost", "P1", CategoryId::new(9999), lenovo.id),
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::PRODUCT_CATEGORY_FK));

    let created = store
        .insert_product(product("ThinkPad", "P2", laptops.id, lenovo.id), Utc::now())
        .await
        .unwrap();
    let mut fields = created.fields();
    fields.brand_id = BrandId::new(9999);
    let err = store.update_product(created.id, fields).await.unwrap_err();
    assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
    assert_eq!(err.constraint(), Some(constraints::PRODUCT_BRAND_FK));

    let unchanged = store.find_product(created.id).await.unwrap().unwrap();
    assert_eq!(unchanged.brand_id, lenovo.id);
}

#[tokio::test]
#[serial]
async fn duplicate_product_code_is_rejected() {
    let store = get_test_store().await;
    let laptops = store.insert_category(category("Laptops")).await.unwrap();
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();

    store
        .insert_product(product("A", "P1", laptops.id, lenovo.id), Utc::now())
        .await
        .unwrap();
    let err = store
        .insert_product(product("B", "P1", laptops.id, lenovo.id), Utc::now())
        .await
        .unwrap_err();

    assert_eq!(err.constraint(), Some(constraints::PRODUCT_CODE_UNIQUE));
    assert!(store.product_code_exists("P1").await.unwrap());
}

#[tokio::test]
#[serial]
async fn referenced_category_cannot_be_deleted() {
    let store = get_test_store().await;
    let laptops = store.insert_category(category("Laptops")).await.unwrap();
    let monitors = store.insert_category(category("Monitors")).await.unwrap();
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();
    store
        .insert_product(product("ThinkPad", "P1", laptops.id, lenovo.id), Utc::now())
        .await
        .unwrap();

    assert!(store.has_dependents(Owner::Category(laptops.id)).await.unwrap());
    let err = store.delete_category(laptops.id).await.unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::PRODUCT_CATEGORY_FK));

    assert!(store.delete_category(monitors.id).await.unwrap());
    assert!(!store.delete_category(monitors.id).await.unwrap());
}

#[tokio::test]
#[serial]
async fn filtered_products_page_in_sort_order() {
    let store = get_test_store().await;
    let laptops = store.insert_category(category("Laptops")).await.unwrap();
    let monitors = store.insert_category(category("Monitors")).await.unwrap();
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();

    for (code, name, price, owner) in [
        ("P1", "ThinkPad X1", dec!(1500.00), laptops.id),
        ("P2", "ThinkPad E14", dec!(800.00), laptops.id),
        ("P3", "IdeaPad", dec!(500.00), laptops.id),
        ("P4", "ThinkVision", dec!(300.00), monitors.id),
    ] {
        let mut fields = product(name, code, owner, lenovo.id);
        fields.price = price;
        store.insert_product(fields, Utc::now()).await.unwrap();
    }

    let query = ProductQuery::new()
        .category(laptops.id)
        .name_contains("thinkpad")
        .sorted_by(ProductSort::new(ProductSortField::Price, SortDirection::Asc));
    let listed = store.list_products(&query).await.unwrap();
    let codes: Vec<_> = listed.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["P2", "P1"]);

    let ranged = ProductQuery::new().price_between(dec!(300.00), dec!(800.00));
    let page = store
        .page_products(&ranged, PageRequest::new(0, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[0].code, "P2");
}

#[tokio::test]
#[serial]
async fn stock_filters() {
    let store = get_test_store().await;
    let laptops = store.insert_category(category("Laptops")).await.unwrap();
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();

    for (code, stock, active) in [("P1", 0, true), ("P2", 3, true), ("P3", 10, false)] {
        let mut fields = product(code, code, laptops.id, lenovo.id);
        fields.stock = stock;
        fields.active = active;
        store.insert_product(fields, Utc::now()).await.unwrap();
    }

    let available = store
        .list_products(&ProductQuery::active().in_stock())
        .await
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].code, "P2");

    let low = store
        .list_products(&ProductQuery::new().stock_below(5))
        .await
        .unwrap();
    assert_eq!(low.len(), 2);
}

#[tokio::test]
#[serial]
async fn name_sort_ignores_case() {
    let store = get_test_store().await;
    let laptops = store.insert_category(category("Laptops")).await.unwrap();
    let lenovo = store.insert_brand(brand("Lenovo", "China")).await.unwrap();

    for (code, name) in [("P1", "zenbook"), ("P2", "Aspire"), ("P3", "ThinkPad"), ("P4", "aspire")] {
        store
            .insert_product(product(name, code, laptops.id, lenovo.id), Utc::now())
            .await
            .unwrap();
    }

    let query =
        ProductQuery::new().sorted_by(ProductSort::new(ProductSortField::Name, SortDirection::Asc));
    let listed = store.list_products(&query).await.unwrap();
    let codes: Vec<_> = listed.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["P2", "P4", "P3", "P1"]);
}
