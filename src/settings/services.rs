use tracing::debug;

use crate::db::Db;
use crate::error::{Error, Result};
use crate::products::dto::NumberOrText;

use super::dto::{SaveSettingsRequest, Settings};

/// Missing or blank means "no goal"; anything else must parse.
fn goal_value(field: &Option<NumberOrText>) -> Result<Option<f64>> {
    let Some(field) = field else {
        return Ok(None);
    };
    if field.is_blank() {
        return Ok(None);
    }
    match field.as_f64() {
        Some(value) if value >= 0.0 => Ok(Some(value)),
        _ => Err(Error::validation("Goals must be non-negative numbers")),
    }
}

/// Validate and store the settings record, replacing any previous one.
pub async fn save_settings(db: &Db, request: SaveSettingsRequest) -> Result<()> {
    let Some(target_calories) =
        goal_value(&request.calories_goal)?.filter(|v| *v != 0.0)
    else {
        return Err(Error::validation("Calories goal is required"));
    };

    let settings = Settings {
        target_calories,
        target_protein: goal_value(&request.protein_goal)?,
        target_carbs: goal_value(&request.carbs_goal)?,
        target_fat: goal_value(&request.fats_goal)?,
    };
    super::repo::save(db, settings).await?;

    debug!(target_calories, "settings updated");
    Ok(())
}

/// Never fails: an installation that has not saved settings yet gets the
/// 2000 kcal default with no macro goals.
pub async fn get_settings(db: &Db) -> Result<Settings> {
    Ok(super::repo::get(db).await?.unwrap_or_default())
}
