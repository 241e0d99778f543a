//! Product service: code uniqueness, owner reference checks and the listing queries.

use catalog_store::{
    BrandId, CatalogStore, CatalogStoreExt, CategoryId, Page, PageRequest, Product,
    ProductFields, ProductId, ProductQuery, ProductSort, StoreError, constraints,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use validator::Validate;

use crate::error::{DomainError, Resource};
use crate::lifecycle::{DeleteOutcome, record_created, record_deleted, record_updated};

use super::{NewProduct, ProductPatch};

/// Service for managing products.
///
/// Products are always hard-deleted. Every write checks that the referenced
/// category and brand exist, and the store's foreign keys back those checks.
pub struct ProductService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> ProductService<S> {
    /// Creates a new product service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.store.list_products(&ProductQuery::new()).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all_paged(
        &self,
        page: PageRequest,
        sort: ProductSort,
    ) -> Result<Page<Product>, DomainError> {
        let query = ProductQuery::new().sorted_by(sort);
        Ok(self.store.page_products(&query, page).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.store.list_products(&ProductQuery::active()).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_active_paged(
        &self,
        page: PageRequest,
        sort: ProductSort,
    ) -> Result<Page<Product>, DomainError> {
        let query = ProductQuery::active().sorted_by(sort);
        Ok(self.store.page_products(&query, page).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.store
            .find_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Product, "id", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_code(&self, code: &str) -> Result<Product, DomainError> {
        self.store
            .find_product_by_code(code)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Product, "codigo", code))
    }

    pub async fn exists_by_code(&self, code: &str) -> Result<bool, DomainError> {
        Ok(self.store.product_code_exists(code).await?)
    }

    /// Lists a category's products. The category itself must exist.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, DomainError> {
        self.ensure_category(category_id).await?;
        Ok(self
            .store
            .list_products(&ProductQuery::new().category(category_id))
            .await?)
    }

    /// Lists a brand's products. The brand itself must exist.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_brand(&self, brand_id: BrandId) -> Result<Vec<Product>, DomainError> {
        self.ensure_brand(brand_id).await?;
        Ok(self
            .store
            .list_products(&ProductQuery::new().brand(brand_id))
            .await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_by_category_and_brand(
        &self,
        category_id: CategoryId,
        brand_id: BrandId,
    ) -> Result<Vec<Product>, DomainError> {
        self.ensure_category(category_id).await?;
        self.ensure_brand(brand_id).await?;

        let query = ProductQuery::new().category(category_id).brand(brand_id);
        Ok(self.store.list_products(&query).await?)
    }

    /// Case-insensitive substring search on the name. An empty fragment matches all.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_name_contains(&self, fragment: &str) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .store
            .list_products(&ProductQuery::new().name_contains(fragment))
            .await?)
    }

    /// Lists products priced within `min..=max`. Inverted bounds match nothing.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .store
            .list_products(&ProductQuery::new().price_between(min, max))
            .await?)
    }

    /// Lists products whose stock is strictly below `threshold`.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_low_stock(&self, threshold: i32) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .store
            .list_products(&ProductQuery::new().stock_below(threshold))
            .await?)
    }

    /// Lists active products with stock on hand.
    #[tracing::instrument(skip(self))]
    pub async fn list_available(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .store
            .list_products(&ProductQuery::active().in_stock())
            .await?)
    }

    /// Creates a product stamped with the current time.
    #[tracing::instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create(&self, input: NewProduct) -> Result<Product, DomainError> {
        input.validate()?;
        let fields = input.into_fields()?;

        if self.store.product_code_exists(&fields.code).await? {
            return Err(DomainError::already_exists(
                Resource::Product,
                "codigo",
                &fields.code,
            ));
        }
        self.ensure_category(fields.category_id).await?;
        self.ensure_brand(fields.brand_id).await?;

        let product = self
            .store
            .insert_product(fields.clone(), Utc::now())
            .await
            .map_err(|e| write_conflict(e, &fields))?;

        info!(product_id = %product.id, code = %product.code, "product created");
        record_created(Resource::Product);
        Ok(product)
    }

    /// Applies a patch. Code and references are only re-checked when they change.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, DomainError> {
        patch.validate()?;
        let current = self.get(id).await?;

        if let Some(ref code) = patch.code
            && *code != current.code
            && self.store.product_code_exists(code).await?
        {
            return Err(DomainError::already_exists(
                Resource::Product,
                "codigo",
                code,
            ));
        }
        if let Some(category_id) = patch.category_id
            && category_id != current.category_id
        {
            self.ensure_category(category_id).await?;
        }
        if let Some(brand_id) = patch.brand_id
            && brand_id != current.brand_id
        {
            self.ensure_brand(brand_id).await?;
        }

        let mut fields = current.fields();
        patch.apply(&mut fields);

        let product = self
            .store
            .update_product(id, fields.clone())
            .await
            .map_err(|e| write_conflict(e, &fields))?
            .ok_or_else(|| DomainError::not_found(Resource::Product, "id", id))?;

        info!(product_id = %id, "product updated");
        record_updated(Resource::Product);
        Ok(product)
    }

    /// Removes a product. Products have no dependents, so this never deactivates.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<DeleteOutcome, DomainError> {
        if !self.store.delete_product(id).await? {
            return Err(DomainError::not_found(Resource::Product, "id", id));
        }

        info!(product_id = %id, "product deleted");
        record_deleted(Resource::Product, DeleteOutcome::Removed);
        Ok(DeleteOutcome::Removed)
    }

    async fn ensure_category(&self, id: CategoryId) -> Result<(), DomainError> {
        if !self.store.category_exists(id).await? {
            return Err(DomainError::not_found(Resource::Category, "id", id));
        }
        Ok(())
    }

    async fn ensure_brand(&self, id: BrandId) -> Result<(), DomainError> {
        if !self.store.brand_exists(id).await? {
            return Err(DomainError::not_found(Resource::Brand, "id", id));
        }
        Ok(())
    }
}

/// Maps a constraint violation on a product write to the matching domain error.
fn write_conflict(err: StoreError, fields: &ProductFields) -> DomainError {
    let mapped = match err.constraint() {
        Some(constraints::PRODUCT_CODE_UNIQUE) => Some(DomainError::already_exists(
            Resource::Product,
            "codigo",
            &fields.code,
        )),
        Some(constraints::PRODUCT_CATEGORY_FK) => Some(DomainError::not_found(
            Resource::Category,
            "id",
            fields.category_id,
        )),
        Some(constraints::PRODUCT_BRAND_FK) => Some(DomainError::not_found(
            Resource::Brand,
            "id",
            fields.brand_id,
        )),
        _ => None,
    };
    mapped.unwrap_or_else(|| err.into())
}
