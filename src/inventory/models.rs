//! Inventory Models
//!
//! Item rows, request DTOs, and the payload validators. Validators collect
//! every violated field rather than stopping at the first.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A purchasable inventory record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated payload for a new item.
#[derive(Debug, Clone)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSweetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl CreateSweetRequest {
    pub fn validate(self) -> Result<NewSweet, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match &self.name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => {
                errors.push(FieldError::new("name", "name is required"));
                String::new()
            }
        };
        let category = match &self.category {
            Some(c) if !c.trim().is_empty() => c.trim().to_string(),
            _ => {
                errors.push(FieldError::new("category", "category is required"));
                String::new()
            }
        };
        let price = match self.price {
            Some(p) if p > 0.0 && p.is_finite() => p,
            _ => {
                errors.push(FieldError::new("price", "price must be a number > 0"));
                0.0
            }
        };
        let quantity = match self.quantity {
            Some(q) if q >= 0 => q,
            _ => {
                errors.push(FieldError::new("quantity", "quantity must be integer >= 0"));
                0
            }
        };

        if errors.is_empty() {
            Ok(NewSweet {
                name,
                category,
                price,
                quantity,
            })
        } else {
            Err(errors)
        }
    }
}

/// Partial update: unspecified fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct SweetPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSweetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl UpdateSweetRequest {
    pub fn validate(self) -> Result<SweetPatch, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match self.name {
            Some(n) => {
                let n = n.trim().to_string();
                if n.is_empty() {
                    errors.push(FieldError::new("name", "name must not be empty"));
                }
                Some(n)
            }
            None => None,
        };
        let category = match self.category {
            Some(c) => {
                let c = c.trim().to_string();
                if c.is_empty() {
                    errors.push(FieldError::new("category", "category must not be empty"));
                }
                Some(c)
            }
            None => None,
        };
        if let Some(p) = self.price {
            if !(p > 0.0 && p.is_finite()) {
                errors.push(FieldError::new("price", "price must be a number > 0"));
            }
        }
        if let Some(q) = self.quantity {
            if q < 0 {
                errors.push(FieldError::new("quantity", "quantity must be integer >= 0"));
            }
        }

        if errors.is_empty() {
            Ok(SweetPatch {
                name,
                category,
                price: self.price,
                quantity: self.quantity,
            })
        } else {
            Err(errors)
        }
    }
}

/// Search filters; all present filters are ANDed.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchFilter {
    /// Parse the raw query-string map, collecting every invalid parameter.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let min_price = parse_price(params.get("minPrice"), "minPrice", &mut errors);
        let max_price = parse_price(params.get("maxPrice"), "maxPrice", &mut errors);

        if errors.is_empty() {
            Ok(Self {
                name: params.get("name").cloned().filter(|s| !s.is_empty()),
                category: params.get("category").cloned().filter(|s| !s.is_empty()),
                min_price,
                max_price,
            })
        } else {
            Err(errors)
        }
    }
}

fn parse_price(
    value: Option<&String>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let raw = value.filter(|s| !s.is_empty())?;
    match raw.parse::<f64>() {
        Ok(p) if p.is_finite() => Some(p),
        _ => {
            errors.push(FieldError::new(field, format!("{field} must be a number")));
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub qty: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub qty: Option<i64>,
}
