use serde::{Deserialize, Serialize};

use crate::products::dto::NumberOrText;

/// Settings form. Only the calorie goal is required; blank macro goals are
/// stored as "no goal".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveSettingsRequest {
    pub calories_goal: Option<NumberOrText>,
    pub protein_goal: Option<NumberOrText>,
    pub carbs_goal: Option<NumberOrText>,
    pub fats_goal: Option<NumberOrText>,
}

/// The single per-installation settings record, stored under a fixed key.
/// Goals are grams per day, calories in kcal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub target_calories: f64,
    pub target_protein: Option<f64>,
    pub target_carbs: Option<f64>,
    pub target_fat: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_calories: 2000.0,
            target_protein: None,
            target_carbs: None,
            target_fat: None,
        }
    }
}
