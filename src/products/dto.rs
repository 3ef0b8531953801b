use serde::{Deserialize, Serialize};

use super::repo_types::ProductRecord;

/// Form input arrives as either a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, NumberOrText::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for NumberOrText {
    fn from(value: f64) -> Self {
        NumberOrText::Number(value)
    }
}

impl From<&str> for NumberOrText {
    fn from(value: &str) -> Self {
        NumberOrText::Text(value.to_string())
    }
}

/// Add-product form. Nutrient values are per 100 g; `fats` keeps the plural
/// spelling of the form field even though the stored field is `fat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddProductRequest {
    pub name: Option<String>,
    pub calories: Option<NumberOrText>,
    pub fats: Option<NumberOrText>,
    pub protein: Option<NumberOrText>,
    pub carbs: Option<NumberOrText>,
}

/// Public product shape; the internal `name_lower` search key is stripped.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            calories: r.calories,
            protein: r.protein,
            carbs: r.carbs,
            fat: r.fat,
        }
    }
}
