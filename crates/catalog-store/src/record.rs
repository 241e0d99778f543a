use chrono::{DateTime, Utc};
use common::{BrandId, CategoryId, ProductId};
use rust_decimal::Decimal;

/// Names of the store constraints that back the catalog's integrity rules.
///
/// Both store implementations report violations using these names.
pub mod constraints {
    pub const CATEGORY_NAME_UNIQUE: &str = "categories_name_key";
    pub const BRAND_NAME_UNIQUE: &str = "brands_name_key";
    pub const PRODUCT_CODE_UNIQUE: &str = "products_code_key";
    pub const PRODUCT_CATEGORY_FK: &str = "products_category_id_fkey";
    pub const PRODUCT_BRAND_FK: &str = "products_brand_id_fkey";
}

/// A persisted category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

/// Writable category columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

impl Category {
    /// Returns the writable columns of this row.
    pub fn fields(&self) -> CategoryFields {
        CategoryFields {
            name: self.name.clone(),
            description: self.description.clone(),
            active: self.active,
        }
    }
}

/// A persisted brand row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub active: bool,
}

/// Writable brand columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandFields {
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub active: bool,
}

impl Brand {
    /// Returns the writable columns of this row.
    pub fn fields(&self) -> BrandFields {
        BrandFields {
            name: self.name.clone(),
            country: self.country.clone(),
            website: self.website.clone(),
            active: self.active,
        }
    }
}

/// A persisted product row joined with the names of its category and brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub code: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub category_id: CategoryId,
    pub brand_id: BrandId,
    pub category_name: String,
    pub brand_name: String,
}

/// Writable product columns. The creation timestamp is not among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub code: String,
    pub image_url: Option<String>,
    pub active: bool,
    pub category_id: CategoryId,
    pub brand_id: BrandId,
}

impl Product {
    /// Returns the writable columns of this row.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock: self.stock,
            code: self.code.clone(),
            image_url: self.image_url.clone(),
            active: self.active,
            category_id: self.category_id,
            brand_id: self.brand_id,
        }
    }

    /// Returns true if the product can be sold right now.
    pub fn is_available(&self) -> bool {
        self.active && self.stock > 0
    }
}

/// An entity that products reference and that therefore may have dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Category(CategoryId),
    Brand(BrandId),
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Category(id) => write!(f, "category {id}"),
            Owner::Brand(id) => write!(f, "brand {id}"),
        }
    }
}
