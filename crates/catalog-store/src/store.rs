use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{BrandId, CategoryId, Page, PageRequest, ProductId};

use crate::{
    Brand, BrandFields, Category, CategoryFields, Owner, Product, ProductFields, ProductQuery,
    Result,
};

/// Core trait for catalog storage implementations.
///
/// A catalog store persists categories, brands and products and enforces the
/// same integrity constraints a relational schema would: unique category and
/// brand names, unique product codes, and product references that must resolve
/// to existing owners. Owners that are still referenced cannot be removed.
///
/// Listings are returned in ascending id order unless a query says otherwise.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Lists categories, optionally only the active ones.
    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>>;

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>>;

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Inserts a category and returns it with its assigned id.
    ///
    /// Fails with `UniqueViolation` if the name is taken.
    async fn insert_category(&self, fields: CategoryFields) -> Result<Category>;

    /// Overwrites a category's columns.
    ///
    /// Returns None if no category has the given id.
    async fn update_category(
        &self,
        id: CategoryId,
        fields: CategoryFields,
    ) -> Result<Option<Category>>;

    /// Removes a category row.
    ///
    /// Returns false if there was nothing to remove. Fails with
    /// `ForeignKeyViolation` if products still reference the category.
    async fn delete_category(&self, id: CategoryId) -> Result<bool>;

    /// Lists brands, optionally only the active ones.
    async fn list_brands(&self, active_only: bool) -> Result<Vec<Brand>>;

    /// Lists brands whose country of origin equals `country` exactly.
    async fn list_brands_by_country(&self, country: &str) -> Result<Vec<Brand>>;

    async fn find_brand(&self, id: BrandId) -> Result<Option<Brand>>;

    async fn find_brand_by_name(&self, name: &str) -> Result<Option<Brand>>;

    async fn insert_brand(&self, fields: BrandFields) -> Result<Brand>;

    async fn update_brand(&self, id: BrandId, fields: BrandFields) -> Result<Option<Brand>>;

    async fn delete_brand(&self, id: BrandId) -> Result<bool>;

    /// Lists the products matching a query.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    /// Returns one page of the products matching a query, with the total count.
    async fn page_products(&self, query: &ProductQuery, page: PageRequest)
    -> Result<Page<Product>>;

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>>;

    async fn find_product_by_code(&self, code: &str) -> Result<Option<Product>>;

    /// Inserts a product stamped with `created_at`.
    ///
    /// Fails with `UniqueViolation` on a taken code and with
    /// `ForeignKeyViolation` if the category or brand does not exist.
    async fn insert_product(
        &self,
        fields: ProductFields,
        created_at: DateTime<Utc>,
    ) -> Result<Product>;

    /// Overwrites a product's columns. The creation timestamp is left untouched.
    ///
    /// Returns None if no product has the given id.
    async fn update_product(&self, id: ProductId, fields: ProductFields)
    -> Result<Option<Product>>;

    async fn delete_product(&self, id: ProductId) -> Result<bool>;

    /// Counts the products that reference an owner.
    async fn count_dependents(&self, owner: Owner) -> Result<u64>;
}

/// Extension trait providing convenience methods for catalog stores.
#[async_trait]
pub trait CatalogStoreExt: CatalogStore {
    async fn category_exists(&self, id: CategoryId) -> Result<bool> {
        Ok(self.find_category(id).await?.is_some())
    }

    async fn category_name_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_category_by_name(name).await?.is_some())
    }

    async fn brand_exists(&self, id: BrandId) -> Result<bool> {
        Ok(self.find_brand(id).await?.is_some())
    }

    async fn brand_name_exists(&self, name: &str) -> Result<bool> {
        Ok(self.find_brand_by_name(name).await?.is_some())
    }

    async fn product_code_exists(&self, code: &str) -> Result<bool> {
        Ok(self.find_product_by_code(code).await?.is_some())
    }

    /// Checks if any product references the owner.
    async fn has_dependents(&self, owner: Owner) -> Result<bool> {
        Ok(self.count_dependents(owner).await? > 0)
    }
}

// Blanket implementation for all CatalogStore implementations
impl<T: CatalogStore + ?Sized> CatalogStoreExt for T {}
