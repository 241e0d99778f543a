//! Integration tests for the catalog services.
//!
//! The three services share one in-memory store, the way the API wires them,
//! so cross-entity rules (owner references, deactivate-on-delete) are exercised
//! end to end.

use std::sync::Arc;

use catalog_store::{
    BrandId, CatalogStoreExt, CategoryId, InMemoryCatalogStore, Owner, PageRequest, ProductSort,
    ProductSortField, SortDirection,
};
use domain::{
    BrandPatch, BrandService, CategoryPatch, CategoryService, DeleteOutcome, DomainError,
    NewBrand, NewCategory, NewProduct, ProductPatch, ProductService, Resource,
};
use rust_decimal_macros::dec;

struct Catalog {
    store: InMemoryCatalogStore,
    categories: CategoryService<InMemoryCatalogStore>,
    brands: BrandService<InMemoryCatalogStore>,
    products: ProductService<InMemoryCatalogStore>,
}

/// Helper to create services over a single shared store
fn create_catalog() -> Catalog {
    create_catalog_over(InMemoryCatalogStore::new())
}

fn create_catalog_over(store: InMemoryCatalogStore) -> Catalog {
    Catalog {
        categories: CategoryService::new(store.clone()),
        brands: BrandService::new(store.clone()),
        products: ProductService::new(store.clone()),
        store,
    }
}

async fn seed(catalog: &Catalog) -> (CategoryId, BrandId) {
    let laptops = catalog
        .categories
        .create(NewCategory::new("Laptops").with_description("Portátiles"))
        .await
        .unwrap();
    let lenovo = catalog
        .brands
        .create(NewBrand::new("Lenovo").with_country("China"))
        .await
        .unwrap();
    (laptops.id, lenovo.id)
}

mod owner_lifecycle {
    use super::*;

    #[tokio::test]
    async fn category_with_products_is_deactivated_then_reactivated() {
        let catalog = create_catalog();
        let (laptops, lenovo) = seed(&catalog).await;
        catalog
            .products
            .create(NewProduct::new("ThinkPad", "P1", dec!(999.99), 5, laptops, lenovo))
            .await
            .unwrap();

        let outcome = catalog.categories.delete(laptops).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deactivated);
        assert_eq!(catalog.store.category_count().await, 1);
        assert_eq!(catalog.store.product_count().await, 1);
        assert!(catalog.categories.list_active().await.unwrap().is_empty());

        // The product still resolves its inactive owner.
        let product = catalog.products.get_by_code("P1").await.unwrap();
        assert_eq!(product.category_name, "Laptops");

        let category = catalog
            .categories
            .update(laptops, CategoryPatch::default().active(true))
            .await
            .unwrap();
        assert!(category.active);
    }

    #[tokio::test]
    async fn owner_is_removed_once_its_products_are_gone() {
        let catalog = create_catalog();
        let (laptops, lenovo) = seed(&catalog).await;
        let product = catalog
            .products
            .create(NewProduct::new("ThinkPad", "P1", dec!(999.99), 5, laptops, lenovo))
            .await
            .unwrap();

        assert_eq!(
            catalog.brands.delete(lenovo).await.unwrap(),
            DeleteOutcome::Deactivated
        );
        catalog.products.delete(product.id).await.unwrap();
        assert!(!catalog.store.has_dependents(Owner::Brand(lenovo)).await.unwrap());

        assert_eq!(
            catalog.brands.delete(lenovo).await.unwrap(),
            DeleteOutcome::Removed
        );
        assert_eq!(catalog.store.brand_count().await, 0);
    }

    #[tokio::test]
    async fn inactive_brand_can_still_be_renamed() {
        let catalog = create_catalog();
        let (_, lenovo) = seed(&catalog).await;
        catalog
            .brands
            .update(lenovo, BrandPatch::default().active(false))
            .await
            .unwrap();

        let renamed = catalog
            .brands
            .update(lenovo, BrandPatch::default().name("Lenovo Group"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Lenovo Group");
        assert!(!renamed.active);
    }
}

mod product_references {
    use super::*;

    #[tokio::test]
    async fn renamed_owner_shows_on_product_reads() {
        let catalog = create_catalog();
        let (laptops, lenovo) = seed(&catalog).await;
        let product = catalog
            .products
            .create(NewProduct::new("ThinkPad", "P1", dec!(999.99), 5, laptops, lenovo))
            .await
            .unwrap();

        catalog
            .categories
            .update(laptops, CategoryPatch::default().name("Notebooks"))
            .await
            .unwrap();

        let reloaded = catalog.products.get(product.id).await.unwrap();
        assert_eq!(reloaded.category_name, "Notebooks");
    }

    #[tokio::test]
    async fn failed_update_changes_nothing() {
        let catalog = create_catalog();
        let (laptops, lenovo) = seed(&catalog).await;
        let product = catalog
            .products
            .create(NewProduct::new("ThinkPad", "P1", dec!(999.99), 5, laptops, lenovo))
            .await
            .unwrap();

        let err = catalog
            .products
            .update(
                product.id,
                ProductPatch::default()
                    .price(dec!(1.00))
                    .brand(BrandId::new(31337)),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                resource: Resource::Brand,
                ..
            }
        ));

        let reloaded = catalog.products.get(product.id).await.unwrap();
        assert_eq!(reloaded, product);
    }

    #[tokio::test]
    async fn paged_active_listing() {
        let catalog = create_catalog();
        let (laptops, lenovo) = seed(&catalog).await;
        for i in 0..5 {
            let input =
                NewProduct::new(format!("Model {i}"), format!("M{i}"), dec!(100), i, laptops, lenovo)
                    .with_active(i != 2);
            catalog.products.create(input).await.unwrap();
        }

        let sort = ProductSort::new(ProductSortField::Stock, SortDirection::Desc);
        let first = catalog
            .products
            .list_active_paged(PageRequest::new(0, 3).unwrap(), sort)
            .await
            .unwrap();
        assert_eq!(first.total_elements, 4);
        assert_eq!(first.total_pages, 2);
        let stocks: Vec<_> = first.content.iter().map(|p| p.stock).collect();
        assert_eq!(stocks, vec![4, 3, 1]);

        let second = catalog
            .products
            .list_active_paged(PageRequest::new(1, 3).unwrap(), sort)
            .await
            .unwrap();
        assert_eq!(second.content.len(), 1);
        assert_eq!(second.content[0].stock, 0);
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_with_same_name_yield_one_row() {
        let catalog = Arc::new(create_catalog());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                catalog.categories.create(NewCategory::new("Laptops")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(DomainError::AlreadyExists { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(catalog.store.category_count().await, 1);
    }
}

/// Writes that lose a race against another request: the service's lookups
/// answer from a stale view, so only the store's constraints catch the clash.
mod store_backstops {
    use super::*;
    use async_trait::async_trait;
    use catalog_store::{
        Brand, BrandFields, CatalogStore, Category, CategoryFields, Page, Product,
        ProductFields, ProductId, ProductQuery, Result as StoreResult,
    };
    use chrono::{DateTime, Utc};

    /// Delegates to an in-memory store but misses on unique-key and dependent
    /// lookups, and reports every owner id as present.
    #[derive(Clone)]
    struct StaleLookups {
        inner: InMemoryCatalogStore,
    }

    #[async_trait]
    impl CatalogStore for StaleLookups {
        async fn list_categories(&self, active_only: bool) -> StoreResult<Vec<Category>> {
            self.inner.list_categories(active_only).await
        }

        async fn find_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
            Ok(Some(self.inner.find_category(id).await?.unwrap_or(Category {
                id,
                name: "Removed".to_string(),
                description: None,
                active: true,
            })))
        }

        async fn find_category_by_name(&self, _: &str) -> StoreResult<Option<Category>> {
            Ok(None)
        }

        async fn insert_category(&self, fields: CategoryFields) -> StoreResult<Category> {
            self.inner.insert_category(fields).await
        }

        async fn update_category(
            &self,
            id: CategoryId,
            fields: CategoryFields,
        ) -> StoreResult<Option<Category>> {
            self.inner.update_category(id, fields).await
        }

        async fn delete_category(&self, id: CategoryId) -> StoreResult<bool> {
            self.inner.delete_category(id).await
        }

        async fn list_brands(&self, active_only: bool) -> StoreResult<Vec<Brand>> {
            self.inner.list_brands(active_only).await
        }

        async fn list_brands_by_country(&self, country: &str) -> StoreResult<Vec<Brand>> {
            self.inner.list_brands_by_country(country).await
        }

        async fn find_brand(&self, id: BrandId) -> StoreResult<Option<Brand>> {
            Ok(Some(self.inner.find_brand(id).await?.unwrap_or(Brand {
                id,
                name: "Removed".to_string(),
                country: None,
                website: None,
                active: true,
            })))
        }

        async fn find_brand_by_name(&self, _: &str) -> StoreResult<Option<Brand>> {
            Ok(None)
        }

        async fn insert_brand(&self, fields: BrandFields) -> StoreResult<Brand> {
            self.inner.insert_brand(fields).await
        }

        async fn update_brand(
            &self,
            id: BrandId,
            fields: BrandFields,
        ) -> StoreResult<Option<Brand>> {
            self.inner.update_brand(id, fields).await
        }

        async fn delete_brand(&self, id: BrandId) -> StoreResult<bool> {
            self.inner.delete_brand(id).await
        }

        async fn list_products(&self, query: &ProductQuery) -> StoreResult<Vec<Product>> {
            self.inner.list_products(query).await
        }

        async fn page_products(
            &self,
            query: &ProductQuery,
            page: PageRequest,
        ) -> StoreResult<Page<Product>> {
            self.inner.page_products(query, page).await
        }

        async fn find_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
            self.inner.find_product(id).await
        }

        async fn find_product_by_code(&self, _: &str) -> StoreResult<Option<Product>> {
            Ok(None)
        }

        async fn insert_product(
            &self,
            fields: ProductFields,
            created_at: DateTime<Utc>,
        ) -> StoreResult<Product> {
            self.inner.insert_product(fields, created_at).await
        }

        async fn update_product(
            &self,
            id: ProductId,
            fields: ProductFields,
        ) -> StoreResult<Option<Product>> {
            self.inner.update_product(id, fields).await
        }

        async fn delete_product(&self, id: ProductId) -> StoreResult<bool> {
            self.inner.delete_product(id).await
        }

        async fn count_dependents(&self, _: Owner) -> StoreResult<u64> {
            Ok(0)
        }
    }

    struct StaleCatalog {
        store: InMemoryCatalogStore,
        categories: CategoryService<StaleLookups>,
        brands: BrandService<StaleLookups>,
        products: ProductService<StaleLookups>,
    }

    /// Seeds Laptops, Lenovo and product P1 through the real store.
    async fn stale_catalog() -> (StaleCatalog, CategoryId, BrandId, ProductId) {
        let store = InMemoryCatalogStore::new();
        let seeded = create_catalog_over(store.clone());
        let (laptops, lenovo) = seed(&seeded).await;
        let product = seeded
            .products
            .create(NewProduct::new("ThinkPad", "P1", dec!(999.99), 5, laptops, lenovo))
            .await
            .unwrap();

        let stale = StaleLookups {
            inner: store.clone(),
        };
        let catalog = StaleCatalog {
            categories: CategoryService::new(stale.clone()),
            brands: BrandService::new(stale.clone()),
            products: ProductService::new(stale),
            store,
        };
        (catalog, laptops, lenovo, product.id)
    }

    #[tokio::test]
    async fn unique_violation_on_owner_write_is_already_exists() {
        let (catalog, _, _, _) = stale_catalog().await;
        let monitors = catalog
            .categories
            .create(NewCategory::new("Monitors"))
            .await
            .unwrap();

        let err = catalog
            .categories
            .create(NewCategory::new("Laptops"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::AlreadyExists {
                resource: Resource::Category,
                ..
            }
        ));

        let err = catalog
            .categories
            .update(monitors.id, CategoryPatch::default().name("Laptops"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Categoria already exists with nombre: 'Laptops'"
        );

        let err = catalog
            .brands
            .create(NewBrand::new("Lenovo"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::AlreadyExists {
                resource: Resource::Brand,
                ..
            }
        ));
        assert_eq!(catalog.store.category_count().await, 2);
        assert_eq!(catalog.store.brand_count().await, 1);
    }

    #[tokio::test]
    async fn unique_violation_on_product_code_is_already_exists() {
        let (catalog, laptops, lenovo, _) = stale_catalog().await;

        let err = catalog
            .products
            .create(NewProduct::new("ThinkPad 2", "P1", dec!(10), 1, laptops, lenovo))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::AlreadyExists {
                resource: Resource::Product,
                ..
            }
        ));
        assert_eq!(catalog.store.product_count().await, 1);
    }

    #[tokio::test]
    async fn foreign_key_violation_on_product_write_is_not_found() {
        let (catalog, laptops, lenovo, product_id) = stale_catalog().await;

        let err = catalog
            .products
            .create(NewProduct::new(
                "Ghost",
                "P2",
                dec!(10),
                1,
                CategoryId::new(999),
                lenovo,
            ))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Categoria not found with id: '999'");

        let err = catalog
            .products
            .update(product_id, ProductPatch::default().brand(BrandId::new(777)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                resource: Resource::Brand,
                ..
            }
        ));

        let unchanged = catalog.products.get(product_id).await.unwrap();
        assert_eq!(unchanged.category_id, laptops);
        assert_eq!(unchanged.brand_id, lenovo);
        assert_eq!(catalog.store.product_count().await, 1);
    }

    #[tokio::test]
    async fn foreign_key_violation_on_owner_delete_deactivates() {
        let (catalog, laptops, lenovo, _) = stale_catalog().await;

        assert_eq!(
            catalog.categories.delete(laptops).await.unwrap(),
            DeleteOutcome::Deactivated
        );
        assert_eq!(
            catalog.brands.delete(lenovo).await.unwrap(),
            DeleteOutcome::Deactivated
        );

        assert_eq!(catalog.store.category_count().await, 1);
        assert_eq!(catalog.store.brand_count().await, 1);
        assert!(!catalog.categories.get(laptops).await.unwrap().active);
        assert!(!catalog.brands.get(lenovo).await.unwrap().active);
        assert_eq!(catalog.store.product_count().await, 1);
    }
}
