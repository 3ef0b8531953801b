use serde::{Deserialize, Serialize};

/// Product as handed to the repository; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub name_lower: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Stored product record. Nutrient values are per 100 g.
///
/// `name_lower` is always the trimmed, lowercased form of `name` and backs
/// the case-insensitive prefix search. Records are immutable once written,
/// apart from deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    pub name_lower: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}
