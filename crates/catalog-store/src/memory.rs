use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{BrandId, CategoryId, Page, PageRequest, ProductId};
use tokio::sync::RwLock;

use crate::{
    Brand, BrandFields, Category, CategoryFields, Owner, Product, ProductFields, ProductQuery,
    Result, StoreError,
    record::constraints,
    store::CatalogStore,
};

#[derive(Debug, Clone)]
struct StoredProduct {
    id: ProductId,
    fields: ProductFields,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    categories: BTreeMap<CategoryId, Category>,
    brands: BTreeMap<BrandId, Brand>,
    products: BTreeMap<ProductId, StoredProduct>,
    last_category_id: i64,
    last_brand_id: i64,
    last_product_id: i64,
}

impl State {
    fn join(&self, stored: &StoredProduct) -> Product {
        let fields = &stored.fields;
        Product {
            id: stored.id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            price: fields.price,
            stock: fields.stock,
            code: fields.code.clone(),
            image_url: fields.image_url.clone(),
            created_at: stored.created_at,
            active: fields.active,
            category_id: fields.category_id,
            brand_id: fields.brand_id,
            category_name: self
                .categories
                .get(&fields.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            brand_name: self
                .brands
                .get(&fields.brand_id)
                .map(|b| b.name.clone())
                .unwrap_or_default(),
        }
    }

    fn matching_products(&self, query: &ProductQuery) -> Vec<Product> {
        let mut products: Vec<_> = self
            .products
            .values()
            .map(|stored| self.join(stored))
            .filter(|product| query.matches(product))
            .collect();
        products.sort_by(|a, b| query.sort.compare(a, b));
        products
    }

    fn check_category_name(&self, name: &str, except: Option<CategoryId>) -> Result<()> {
        if self
            .categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
        {
            return Err(unique(constraints::CATEGORY_NAME_UNIQUE));
        }
        Ok(())
    }

    fn check_brand_name(&self, name: &str, except: Option<BrandId>) -> Result<()> {
        if self
            .brands
            .values()
            .any(|b| b.name == name && Some(b.id) != except)
        {
            return Err(unique(constraints::BRAND_NAME_UNIQUE));
        }
        Ok(())
    }

    fn check_product(&self, fields: &ProductFields, except: Option<ProductId>) -> Result<()> {
        if self
            .products
            .values()
            .any(|p| p.fields.code == fields.code && Some(p.id) != except)
        {
            return Err(unique(constraints::PRODUCT_CODE_UNIQUE));
        }
        if !self.categories.contains_key(&fields.category_id) {
            return Err(foreign_key(constraints::PRODUCT_CATEGORY_FK));
        }
        if !self.brands.contains_key(&fields.brand_id) {
            return Err(foreign_key(constraints::PRODUCT_BRAND_FK));
        }
        Ok(())
    }

    fn dependents(&self, owner: Owner) -> u64 {
        self.products
            .values()
            .filter(|p| match owner {
                Owner::Category(id) => p.fields.category_id == id,
                Owner::Brand(id) => p.fields.brand_id == id,
            })
            .count() as u64
    }
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn foreign_key(constraint: &str) -> StoreError {
    StoreError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

/// In-memory catalog store implementation for testing and local runs.
///
/// Enforces the same unique and foreign-key constraints as the PostgreSQL
/// schema and reports violations under the same constraint names.
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty in-memory catalog store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn category_count(&self) -> usize {
        self.state.read().await.categories.len()
    }

    pub async fn brand_count(&self) -> usize {
        self.state.read().await.brands.len()
    }

    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }

    /// Removes every row. Id sequences keep counting.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.products.clear();
        state.categories.clear();
        state.brands.clear();
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .values()
            .filter(|c| !active_only || c.active)
            .cloned()
            .collect())
    }

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.values().find(|c| c.name == name).cloned())
    }

    async fn insert_category(&self, fields: CategoryFields) -> Result<Category> {
        let mut state = self.state.write().await;
        state.check_category_name(&fields.name, None)?;

        state.last_category_id += 1;
        let category = Category {
            id: CategoryId::new(state.last_category_id),
            name: fields.name,
            description: fields.description,
            active: fields.active,
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        fields: CategoryFields,
    ) -> Result<Option<Category>> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&id) {
            return Ok(None);
        }
        state.check_category_name(&fields.name, Some(id))?;

        let category = Category {
            id,
            name: fields.name,
            description: fields.description,
            active: fields.active,
        };
        state.categories.insert(id, category.clone());
        Ok(Some(category))
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.dependents(Owner::Category(id)) > 0 {
            return Err(foreign_key(constraints::PRODUCT_CATEGORY_FK));
        }
        Ok(state.categories.remove(&id).is_some())
    }

    async fn list_brands(&self, active_only: bool) -> Result<Vec<Brand>> {
        let state = self.state.read().await;
        Ok(state
            .brands
            .values()
            .filter(|b| !active_only || b.active)
            .cloned()
            .collect())
    }

    async fn list_brands_by_country(&self, country: &str) -> Result<Vec<Brand>> {
        let state = self.state.read().await;
        Ok(state
            .brands
            .values()
            .filter(|b| b.country.as_deref() == Some(country))
            .cloned()
            .collect())
    }

    async fn find_brand(&self, id: BrandId) -> Result<Option<Brand>> {
        Ok(self.state.read().await.brands.get(&id).cloned())
    }

    async fn find_brand_by_name(&self, name: &str) -> Result<Option<Brand>> {
        let state = self.state.read().await;
        Ok(state.brands.values().find(|b| b.name == name).cloned())
    }

    async fn insert_brand(&self, fields: BrandFields) -> Result<Brand> {
        let mut state = self.state.write().await;
        state.check_brand_name(&fields.name, None)?;

        state.last_brand_id += 1;
        let brand = Brand {
            id: BrandId::new(state.last_brand_id),
            name: fields.name,
            country: fields.country,
            website: fields.website,
            active: fields.active,
        };
        state.brands.insert(brand.id, brand.clone());
        Ok(brand)
    }

    async fn update_brand(&self, id: BrandId, fields: BrandFields) -> Result<Option<Brand>> {
        let mut state = self.state.write().await;
        if !state.brands.contains_key(&id) {
            return Ok(None);
        }
        state.check_brand_name(&fields.name, Some(id))?;

        let brand = Brand {
            id,
            name: fields.name,
            country: fields.country,
            website: fields.website,
            active: fields.active,
        };
        state.brands.insert(id, brand.clone());
        Ok(Some(brand))
    }

    async fn delete_brand(&self, id: BrandId) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.dependents(Owner::Brand(id)) > 0 {
            return Err(foreign_key(constraints::PRODUCT_BRAND_FK));
        }
        Ok(state.brands.remove(&id).is_some())
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        Ok(self.state.read().await.matching_products(query))
    }

    async fn page_products(
        &self,
        query: &ProductQuery,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let products = self.state.read().await.matching_products(query);
        let total = products.len() as u64;
        let content = products
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size()).unwrap_or(usize::MAX))
            .collect();
        Ok(Page::new(content, total, page))
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).map(|stored| state.join(stored)))
    }

    async fn find_product_by_code(&self, code: &str) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .find(|p| p.fields.code == code)
            .map(|stored| state.join(stored)))
    }

    async fn insert_product(
        &self,
        fields: ProductFields,
        created_at: DateTime<Utc>,
    ) -> Result<Product> {
        let mut state = self.state.write().await;
        state.check_product(&fields, None)?;

        state.last_product_id += 1;
        let stored = StoredProduct {
            id: ProductId::new(state.last_product_id),
            fields,
            created_at,
        };
        let product = state.join(&stored);
        state.products.insert(stored.id, stored);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Option<Product>> {
        let mut state = self.state.write().await;
        let Some(created_at) = state.products.get(&id).map(|p| p.created_at) else {
            return Ok(None);
        };
        state.check_product(&fields, Some(id))?;

        let stored = StoredProduct {
            id,
            fields,
            created_at,
        };
        let product = state.join(&stored);
        state.products.insert(id, stored);
        Ok(Some(product))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }

    async fn count_dependents(&self, owner: Owner) -> Result<u64> {
        Ok(self.state.read().await.dependents(owner))
    }
}
