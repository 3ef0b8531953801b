use serde::{Deserialize, Serialize};

/// One product-and-quantity entry inside a meal.
///
/// `product_name` is a snapshot taken when the meal was created; renaming or
/// deleting the product later does not rewrite history. The four nutrient
/// values are already scaled to `grams`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLine {
    pub product_id: u64,
    pub product_name: String,
    pub grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Meal as handed to the repository; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub date: String,
    pub timestamp: i64,
    pub products: Vec<MealLine>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

/// Stored meal record. `date` is the UTC calendar date (`YYYY-MM-DD`) used
/// as the history grouping key; `timestamp` is milliseconds since epoch.
/// Totals always equal the sums of the per-line values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: u64,
    pub date: String,
    pub timestamp: i64,
    pub products: Vec<MealLine>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}
