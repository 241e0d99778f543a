use catalog_store::{BrandId, CategoryId, ProductFields};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::validation::{not_blank, required, valid_price};

const PRICE_REQUIRED: &str = "El precio es obligatorio";
const STOCK_REQUIRED: &str = "El stock es obligatorio";
const CATEGORY_REQUIRED: &str = "La categoría es obligatoria";
const BRAND_REQUIRED: &str = "La marca es obligatoria";

/// Input for creating a product.
///
/// Required fields that are absent from a request body deserialize to `None`
/// or an empty string and are reported by `validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[serde(rename = "nombre", default)]
    #[validate(
        custom(function = "not_blank", message = "El nombre del producto es obligatorio"),
        length(min = 2, max = 150, message = "El nombre debe tener entre 2 y 150 caracteres")
    )]
    pub name: String,

    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 500, message = "La descripción no debe exceder los 500 caracteres"))]
    pub description: Option<String>,

    #[serde(rename = "precio", default)]
    #[validate(required(message = "El precio es obligatorio"), custom(function = "valid_price"))]
    pub price: Option<Decimal>,

    #[serde(default)]
    #[validate(
        required(message = "El stock es obligatorio"),
        range(min = 0, message = "El stock no puede ser negativo")
    )]
    pub stock: Option<i32>,

    #[serde(rename = "codigo", default)]
    #[validate(
        custom(function = "not_blank", message = "El código del producto es obligatorio"),
        length(min = 2, max = 50, message = "El código debe tener entre 2 y 50 caracteres")
    )]
    pub code: String,

    #[serde(rename = "imagenUrl", default)]
    #[validate(length(max = 255, message = "La URL de la imagen no debe exceder los 255 caracteres"))]
    pub image_url: Option<String>,

    #[serde(rename = "activo", default)]
    pub active: Option<bool>,

    #[serde(rename = "categoriaId", default)]
    #[validate(required(message = "La categoría es obligatoria"))]
    pub category_id: Option<CategoryId>,

    #[serde(rename = "marcaId", default)]
    #[validate(required(message = "La marca es obligatoria"))]
    pub brand_id: Option<BrandId>,
}

impl NewProduct {
    /// Creates an input with every required field set.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        price: Decimal,
        stock: i32,
        category_id: CategoryId,
        brand_id: BrandId,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            price: Some(price),
            stock: Some(stock),
            category_id: Some(category_id),
            brand_id: Some(brand_id),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub(crate) fn into_fields(self) -> Result<ProductFields, ValidationErrors> {
        Ok(ProductFields {
            price: required(self.price, "precio", PRICE_REQUIRED)?,
            stock: required(self.stock, "stock", STOCK_REQUIRED)?,
            category_id: required(self.category_id, "categoriaId", CATEGORY_REQUIRED)?,
            brand_id: required(self.brand_id, "marcaId", BRAND_REQUIRED)?,
            name: self.name,
            description: self.description,
            code: self.code,
            image_url: self.image_url,
            active: self.active.unwrap_or(true),
        })
    }
}

/// Partial update for a product. The creation timestamp cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductPatch {
    #[serde(rename = "nombre", default)]
    #[validate(
        custom(function = "not_blank", message = "El nombre del producto es obligatorio"),
        length(min = 2, max = 150, message = "El nombre debe tener entre 2 y 150 caracteres")
    )]
    pub name: Option<String>,

    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 500, message = "La descripción no debe exceder los 500 caracteres"))]
    pub description: Option<String>,

    #[serde(rename = "precio", default)]
    #[validate(custom(function = "valid_price"))]
    pub price: Option<Decimal>,

    #[serde(default)]
    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub stock: Option<i32>,

    #[serde(rename = "codigo", default)]
    #[validate(
        custom(function = "not_blank", message = "El código del producto es obligatorio"),
        length(min = 2, max = 50, message = "El código debe tener entre 2 y 50 caracteres")
    )]
    pub code: Option<String>,

    #[serde(rename = "imagenUrl", default)]
    #[validate(length(max = 255, message = "La URL de la imagen no debe exceder los 255 caracteres"))]
    pub image_url: Option<String>,

    #[serde(rename = "activo", default)]
    pub active: Option<bool>,

    #[serde(rename = "categoriaId", default)]
    pub category_id: Option<CategoryId>,

    #[serde(rename = "marcaId", default)]
    pub brand_id: Option<BrandId>,
}

impl ProductPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn stock(mut self, stock: i32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn brand(mut self, id: BrandId) -> Self {
        self.brand_id = Some(id);
        self
    }

    pub(crate) fn apply(self, fields: &mut ProductFields) {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(description) = self.description {
            fields.description = Some(description);
        }
        if let Some(price) = self.price {
            fields.price = price;
        }
        if let Some(stock) = self.stock {
            fields.stock = stock;
        }
        if let Some(code) = self.code {
            fields.code = code;
        }
        if let Some(image_url) = self.image_url {
            fields.image_url = Some(image_url);
        }
        if let Some(active) = self.active {
            fields.active = active;
        }
        if let Some(id) = self.category_id {
            fields.category_id = id;
        }
        if let Some(id) = self.brand_id {
            fields.brand_id = id;
        }
    }
}
