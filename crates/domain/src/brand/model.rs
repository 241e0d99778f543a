use catalog_store::BrandFields;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;

/// Input for creating a brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewBrand {
    #[serde(rename = "nombre", default)]
    #[validate(
        custom(function = "not_blank", message = "El nombre de la marca es obligatorio"),
        length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres")
    )]
    pub name: String,

    #[serde(rename = "paisOrigen", default)]
    #[validate(length(max = 100, message = "El país de origen no debe exceder los 100 caracteres"))]
    pub country: Option<String>,

    #[serde(rename = "sitioWeb", default)]
    #[validate(length(max = 255, message = "El sitio web no debe exceder los 255 caracteres"))]
    pub website: Option<String>,

    #[serde(rename = "activo", default)]
    pub active: Option<bool>,
}

impl NewBrand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub(crate) fn into_fields(self) -> BrandFields {
        BrandFields {
            name: self.name,
            country: self.country,
            website: self.website,
            active: self.active.unwrap_or(true),
        }
    }
}

/// Partial update for a brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BrandPatch {
    #[serde(rename = "nombre", default)]
    #[validate(
        custom(function = "not_blank", message = "El nombre de la marca es obligatorio"),
        length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres")
    )]
    pub name: Option<String>,

    #[serde(rename = "paisOrigen", default)]
    #[validate(length(max = 100, message = "El país de origen no debe exceder los 100 caracteres"))]
    pub country: Option<String>,

    #[serde(rename = "sitioWeb", default)]
    #[validate(length(max = 255, message = "El sitio web no debe exceder los 255 caracteres"))]
    pub website: Option<String>,

    #[serde(rename = "activo", default)]
    pub active: Option<bool>,
}

impl BrandPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub(crate) fn apply(self, fields: &mut BrandFields) {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(country) = self.country {
            fields.country = Some(country);
        }
        if let Some(website) = self.website {
            fields.website = Some(website);
        }
        if let Some(active) = self.active {
            fields.active = active;
        }
    }
}
