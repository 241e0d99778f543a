use std::cmp::Ordering;

use common::{BrandId, CategoryId, SortDirection};
use rust_decimal::Decimal;

use crate::Product;

/// Product columns a listing may be ordered by.
///
/// Text columns order case-insensitively by code point in both stores, so
/// pages come out the same whatever collation the database was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductSortField {
    #[default]
    Id,
    Name,
    Price,
    Stock,
    Code,
    CreatedAt,
}

impl ProductSortField {
    /// Returns the expression used in SQL `ORDER BY`.
    pub fn order_expr(&self) -> &'static str {
        match self {
            ProductSortField::Id => "p.id",
            ProductSortField::Name => r#"LOWER(p.name) COLLATE "C""#,
            ProductSortField::Price => "p.price",
            ProductSortField::Stock => "p.stock",
            ProductSortField::Code => r#"LOWER(p.code) COLLATE "C""#,
            ProductSortField::CreatedAt => "p.created_at",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSortField::Id => a.id.cmp(&b.id),
            ProductSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            ProductSortField::Price => a.price.cmp(&b.price),
            ProductSortField::Stock => a.stock.cmp(&b.stock),
            ProductSortField::Code => a.code.to_lowercase().cmp(&b.code.to_lowercase()),
            ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// Ordering applied to a product listing. Ties are always broken by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

impl ProductSort {
    pub fn new(field: ProductSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two products under this ordering.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self.direction {
            SortDirection::Asc => self.field.compare(a, b),
            SortDirection::Desc => self.field.compare(b, a),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

/// Builder for filtered product listings.
///
/// Every filter that is set must match; an empty query matches every product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    /// Filter by owning category.
    pub category_id: Option<CategoryId>,

    /// Filter by owning brand.
    pub brand_id: Option<BrandId>,

    /// Case-insensitive substring of the product name. An empty string matches all.
    pub name_contains: Option<String>,

    /// Minimum price (inclusive).
    pub min_price: Option<Decimal>,

    /// Maximum price (inclusive).
    pub max_price: Option<Decimal>,

    /// Stock strictly below this value.
    pub stock_below: Option<i32>,

    /// Filter by the active flag.
    pub active: Option<bool>,

    /// Only products with stock greater than zero.
    pub in_stock: bool,

    /// Result ordering; defaults to ascending id.
    pub sort: ProductSort,
}

impl ProductQuery {
    /// Creates a query that matches every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for active products only.
    pub fn active() -> Self {
        Self::new().active_flag(true)
    }

    pub fn category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn brand(mut self, id: BrandId) -> Self {
        self.brand_id = Some(id);
        self
    }

    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Restricts prices to `min..=max`.
    pub fn price_between(mut self, min: Decimal, max: Decimal) -> Self {
        self.min_price = Some(min);
        self.max_price = Some(max);
        self
    }

    pub fn stock_below(mut self, threshold: i32) -> Self {
        self.stock_below = Some(threshold);
        self
    }

    pub fn active_flag(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn in_stock(mut self) -> Self {
        self.in_stock = true;
        self
    }

    pub fn sorted_by(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    /// Returns true if the product satisfies every filter in this query.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(id) = self.category_id
            && product.category_id != id
        {
            return false;
        }
        if let Some(id) = self.brand_id
            && product.brand_id != id
        {
            return false;
        }
        if let Some(ref fragment) = self.name_contains
            && !product
                .name
                .to_lowercase()
                .contains(&fragment.to_lowercase())
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        if let Some(threshold) = self.stock_below
            && product.stock >= threshold
        {
            return false;
        }
        if let Some(active) = self.active
            && product.active != active
        {
            return false;
        }
        if self.in_stock && product.stock <= 0 {
            return false;
        }
        true
    }
}
