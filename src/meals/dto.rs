use serde::{Deserialize, Serialize};

use super::repo_types::{MealLine, MealRecord};

/// One requested meal line: which product and how many grams of it.
#[derive(Debug, Clone, Deserialize)]
pub struct MealLineRequest {
    pub product_id: u64,
    pub grams: f64,
}

/// Public meal shape returned to screens.
#[derive(Debug, Clone, Serialize)]
pub struct Meal {
    pub id: u64,
    pub date: String,
    pub timestamp: i64,
    pub products: Vec<MealLine>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

impl From<MealRecord> for Meal {
    fn from(r: MealRecord) -> Self {
        Self {
            id: r.id,
            date: r.date,
            timestamp: r.timestamp,
            products: r.products,
            total_calories: r.total_calories,
            total_protein: r.total_protein,
            total_carbs: r.total_carbs,
            total_fat: r.total_fat,
        }
    }
}

/// Summed nutrients for a set of meals, typically one day's worth.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub fats: f64,
    pub protein: f64,
    pub carbs: f64,
}
