use catalog_store::{
    Brand, BrandId, CatalogStore, CatalogStoreExt, Owner, StoreError, constraints,
};
use tracing::{info, warn};
use validator::Validate;

use crate::error::{DomainError, Resource};
use crate::lifecycle::{DeleteOutcome, record_created, record_deleted, record_updated};

use super::{BrandPatch, NewBrand};

/// Service for managing brands.
///
/// Mirrors the category rules: names are unique, and a brand that still
/// has products is deactivated rather than removed.
pub struct BrandService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> BrandService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Brand>, DomainError> {
        Ok(self.store.list_brands(false).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Brand>, DomainError> {
        Ok(self.store.list_brands(true).await?)
    }

    /// Lists brands from exactly this country. No match is an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_country(&self, country: &str) -> Result<Vec<Brand>, DomainError> {
        Ok(self.store.list_brands_by_country(country).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: BrandId) -> Result<Brand, DomainError> {
        self.store
            .find_brand(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Brand, "id", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Brand, DomainError> {
        self.store
            .find_brand_by_name(name)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Brand, "nombre", name))
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError> {
        Ok(self.store.brand_name_exists(name).await?)
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: NewBrand) -> Result<Brand, DomainError> {
        input.validate()?;

        if self.store.brand_name_exists(&input.name).await? {
            return Err(DomainError::already_exists(
                Resource::Brand,
                "nombre",
                &input.name,
            ));
        }

        let fields = input.into_fields();
        let name = fields.name.clone();
        let brand = self
            .store
            .insert_brand(fields)
            .await
            .map_err(|e| name_conflict(e, &name))?;

        info!(brand_id = %brand.id, "brand created");
        record_created(Resource::Brand);
        Ok(brand)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: BrandId, patch: BrandPatch) -> Result<Brand, DomainError> {
        patch.validate()?;
        let current = self.get(id).await?;

        if let Some(ref name) = patch.name
            && *name != current.name
            && self.store.brand_name_exists(name).await?
        {
            return Err(DomainError::already_exists(Resource::Brand, "nombre", name));
        }

        let mut fields = current.fields();
        patch.apply(&mut fields);
        let name = fields.name.clone();

        let brand = self
            .store
            .update_brand(id, fields)
            .await
            .map_err(|e| name_conflict(e, &name))?
            .ok_or_else(|| DomainError::not_found(Resource::Brand, "id", id))?;

        info!(brand_id = %id, "brand updated");
        record_updated(Resource::Brand);
        Ok(brand)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: BrandId) -> Result<DeleteOutcome, DomainError> {
        let brand = self.get(id).await?;

        let outcome = if self.store.has_dependents(Owner::Brand(id)).await? {
            self.deactivate(brand).await?
        } else {
            match self.store.delete_brand(id).await {
                Ok(true) => DeleteOutcome::Removed,
                Ok(false) => return Err(DomainError::not_found(Resource::Brand, "id", id)),
                Err(StoreError::ForeignKeyViolation { .. }) => {
                    warn!(brand_id = %id, "product added during delete, deactivating");
                    self.deactivate(brand).await?
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!(brand_id = %id, outcome = outcome.as_str(), "brand deleted");
        record_deleted(Resource::Brand, outcome);
        Ok(outcome)
    }

    async fn deactivate(&self, brand: Brand) -> Result<DeleteOutcome, DomainError> {
        let id = brand.id;
        let mut fields = brand.fields();
        fields.active = false;

        self.store
            .update_brand(id, fields)
            .await?
            .ok_or_else(|| DomainError::not_found(Resource::Brand, "id", id))?;

        Ok(DeleteOutcome::Deactivated)
    }
}

fn name_conflict(err: StoreError, name: &str) -> DomainError {
    if err.constraint() == Some(constraints::BRAND_NAME_UNIQUE) {
        return DomainError::already_exists(Resource::Brand, "nombre", name);
    }
    err.into()
}
