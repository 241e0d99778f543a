use catalog_store::CategoryFields;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::not_blank;

/// Input for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewCategory {
    #[serde(rename = "nombre", default)]
    #[validate(
        custom(function = "not_blank", message = "El nombre de la categoría es obligatorio"),
        length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres")
    )]
    pub name: String,

    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 255, message = "La descripción no debe exceder los 255 caracteres"))]
    pub description: Option<String>,

    /// Defaults to active when omitted.
    #[serde(rename = "activo", default)]
    pub active: Option<bool>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub(crate) fn into_fields(self) -> CategoryFields {
        CategoryFields {
            name: self.name,
            description: self.description,
            active: self.active.unwrap_or(true),
        }
    }
}

/// Partial update for a category. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryPatch {
    #[serde(rename = "nombre", default)]
    #[validate(
        custom(function = "not_blank", message = "El nombre de la categoría es obligatorio"),
        length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres")
    )]
    pub name: Option<String>,

    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 255, message = "La descripción no debe exceder los 255 caracteres"))]
    pub description: Option<String>,

    #[serde(rename = "activo", default)]
    pub active: Option<bool>,
}

impl CategoryPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub(crate) fn apply(self, fields: &mut CategoryFields) {
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(description) = self.description {
            fields.description = Some(description);
        }
        if let Some(active) = self.active {
            fields.active = active;
        }
    }
}
