use redb::ReadableTable;
use tokio::task;
use tracing::debug;

use crate::db::{self, Db, MEALS, MEAL_DATE_INDEX};
use crate::error::Result;

use super::repo_types::{MealRecord, NewMeal};

const MEAL_SEQ: &str = "meals.seq";

/// Insert a complete, pre-aggregated meal and its date-index entry in one
/// write transaction.
pub async fn insert(db: &Db, meal: NewMeal) -> Result<MealRecord> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_write()?;
        let record = {
            let id = db::next_id(&txn, MEAL_SEQ)?;
            let record = MealRecord {
                id,
                date: meal.date,
                timestamp: meal.timestamp,
                products: meal.products,
                total_calories: meal.total_calories,
                total_protein: meal.total_protein,
                total_carbs: meal.total_carbs,
                total_fat: meal.total_fat,
            };

            let mut meals = txn.open_table(MEALS)?;
            meals.insert(id, serde_json::to_vec(&record)?.as_slice())?;

            let mut index = txn.open_table(MEAL_DATE_INDEX)?;
            index.insert((record.date.as_str(), id), ())?;

            record
        };
        txn.commit()?;

        debug!(id = record.id, date = %record.date, "meal inserted");
        Ok(record)
    })
    .await?
}

/// Walk the date index newest-first, skipping `offset` entries and stopping
/// once `limit` meals are collected. Within one date, later insertions come
/// first.
pub async fn recent(db: &Db, limit: usize, offset: usize) -> Result<Vec<MealRecord>> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_read()?;
        let index = txn.open_table(MEAL_DATE_INDEX)?;
        let meals = txn.open_table(MEALS)?;

        let mut out = Vec::new();
        for entry in index.iter()?.rev().skip(offset).take(limit) {
            let (key, _) = entry?;
            let (_, id) = key.value();
            if let Some(raw) = meals.get(id)? {
                out.push(serde_json::from_slice::<MealRecord>(raw.value())?);
            }
        }
        Ok(out)
    })
    .await?
}

/// Same descending walk restricted to a single date key.
pub async fn for_date(
    db: &Db,
    date: String,
    limit: usize,
    offset: usize,
) -> Result<Vec<MealRecord>> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_read()?;
        let index = txn.open_table(MEAL_DATE_INDEX)?;
        let meals = txn.open_table(MEALS)?;

        let range = index.range((date.as_str(), 0u64)..=(date.as_str(), u64::MAX))?;

        let mut out = Vec::new();
        for entry in range.rev().skip(offset).take(limit) {
            let (key, _) = entry?;
            let (_, id) = key.value();
            if let Some(raw) = meals.get(id)? {
                out.push(serde_json::from_slice::<MealRecord>(raw.value())?);
            }
        }
        Ok(out)
    })
    .await?
}
