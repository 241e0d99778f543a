//! Category service applying uniqueness and delete rules on top of a catalog store.

use catalog_store::{
    CatalogStore, CatalogStoreExt, Category, CategoryId, Owner, StoreError, constraints,
};
use tracing::{info, warn};
use validator::Validate;

use crate::error::{DomainError, Resource};
use crate::lifecycle::{DeleteOutcome, record_created, record_deleted, record_updated};

use super::{CategoryPatch, NewCategory};

/// Service for managing categories.
pub struct CategoryService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> CategoryService<S> {
    /// Creates a new category service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.store.list_categories(false).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.store.list_categories(true).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: CategoryId) -> Result<Category, DomainError> {
        self.store
            .find_category(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Category, "id", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Category, DomainError> {
        self.store
            .find_category_by_name(name)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Category, "nombre", name))
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.store.category_name_exists(name).await?)
    }

    /// Creates a category after checking that its name is free.
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewCategory) -> Result<Category, DomainError> {
        input.validate()?;

        if self.store.category_name_exists(&input.name).await? {
            return Err(DomainError::already_exists(
                Resource::Category,
                "nombre",
                &input.name,
            ));
        }

        let fields = input.into_fields();
        let name = fields.name.clone();
        let category = self
            .store
            .insert_category(fields)
            .await
            .map_err(|e| name_conflict(e, &name))?;

        info!(category_id = %category.id, "category created");
        record_created(Resource::Category);
        Ok(category)
    }

    /// Applies a patch. The name is only re-checked when it changes.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, DomainError> {
        patch.validate()?;
        let current = self.get(id).await?;

        if let Some(ref name) = patch.name
            && *name != current.name
            && self.store.category_name_exists(name).await?
        {
            return Err(DomainError::already_exists(
                Resource::Category,
                "nombre",
                name,
            ));
        }

        let mut fields = current.fields();
        patch.apply(&mut fields);
        let name = fields.name.clone();

        let category = self
            .store
            .update_category(id, fields)
            .await
            .map_err(|e| name_conflict(e, &name))?
            .ok_or_else(|| DomainError::not_found(Resource::Category, "id", id))?;

        info!(category_id = %id, "category updated");
        record_updated(Resource::Category);
        Ok(category)
    }

    /// Removes a category, or deactivates it when products still reference it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: CategoryId) -> Result<DeleteOutcome, DomainError> {
        let category = self.get(id).await?;

        let outcome = if self.store.has_dependents(Owner::Category(id)).await? {
            self.deactivate(category).await?
        } else {
            match self.store.delete_category(id).await {
                Ok(true) => DeleteOutcome::Removed,
                Ok(false) => return Err(DomainError::not_found(Resource::Category, "id", id)),
                Err(StoreError::ForeignKeyViolation { .. }) => {
                    warn!(category_id = %id, "product added during delete, deactivating");
                    self.deactivate(category).await?
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!(category_id = %id, outcome = outcome.as_str(), "category deleted");
        record_deleted(Resource::Category, outcome);
        Ok(outcome)
    }

    async fn deactivate(&self, category: Category) -> Result<DeleteOutcome, DomainError> {
        let id = category.id;
        let mut fields = category.fields();
        fields.active = false;

        self.store
            .update_category(id, fields)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Category, "id", id))?;

        Ok(DeleteOutcome::Deactivated)
    }
}

fn name_conflict(err: StoreError, name: &str) -> DomainError {
    if err.constraint() == Some(constraints::CATEGORY_NAME_UNIQUE) {
        return DomainError::already_exists(Resource::Category, "nombre", name);
    }
    err.into()
}
