use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::debug;

use crate::db::Db;
use crate::error::{Error, Result};
use crate::products;
use crate::products::repo_types::ProductRecord;

use super::dto::{DailyTotals, Meal, MealLineRequest};
use super::repo;
use super::repo_types::{MealLine, NewMeal};

const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Scale a per-100g nutrient value to a gram amount, rounded to one decimal
/// place (half away from zero).
pub fn calculate_nutrient(value_per_100g: f64, grams: f64) -> f64 {
    (value_per_100g * grams / 100.0 * 10.0).round() / 10.0
}

/// Compose and store a meal from (product, grams) pairs.
///
/// Every referenced product must exist at composition time; its name and the
/// scaled nutrient values are frozen into the meal lines, so later catalog
/// changes do not rewrite history. The meal is stamped with the UTC calendar
/// date and a millisecond timestamp and written in one atomic insert.
pub async fn add_meal(db: &Db, lines: Vec<MealLineRequest>) -> Result<()> {
    if lines.is_empty() {
        return Err(Error::validation("At least one product is required"));
    }

    let catalog = products::repo::list_all(db).await?;
    let by_id: HashMap<u64, ProductRecord> =
        catalog.into_iter().map(|p| (p.id, p)).collect();

    let mut meal_lines = Vec::with_capacity(lines.len());
    for line in &lines {
        let product = by_id
            .get(&line.product_id)
            .ok_or(Error::ProductNotFound(line.product_id))?;
        if !line.grams.is_finite() || line.grams <= 0.0 {
            return Err(Error::validation("Grams must be a positive number"));
        }

        meal_lines.push(MealLine {
            product_id: product.id,
            product_name: product.name.clone(),
            grams: line.grams,
            calories: calculate_nutrient(product.calories, line.grams),
            protein: calculate_nutrient(product.protein, line.grams),
            carbs: calculate_nutrient(product.carbs, line.grams),
            fat: calculate_nutrient(product.fat, line.grams),
        });
    }

    let total_calories = meal_lines.iter().map(|l| l.calories).sum();
    let total_protein = meal_lines.iter().map(|l| l.protein).sum();
    let total_carbs = meal_lines.iter().map(|l| l.carbs).sum();
    let total_fat = meal_lines.iter().map(|l| l.fat).sum();

    let now = OffsetDateTime::now_utc();
    let record = repo::insert(
        db,
        NewMeal {
            date: now.date().to_string(),
            timestamp: (now.unix_timestamp_nanos() / 1_000_000) as i64,
            products: meal_lines,
            total_calories,
            total_protein,
            total_carbs,
            total_fat,
        },
    )
    .await?;

    debug!(id = record.id, lines = record.products.len(), "meal added");
    Ok(())
}

/// Most recent meals, newest first. `None` means the default limit of 100.
pub async fn get_meal_history(db: &Db, limit: Option<usize>) -> Result<Vec<Meal>> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let records = repo::recent(db, limit, 0).await?;
    Ok(records.into_iter().map(Meal::from).collect())
}

/// Meals of one calendar date, newest first, with skip-count pagination.
pub async fn get_meals_for_date(
    db: &Db,
    date: &str,
    limit: usize,
    offset: usize,
) -> Result<Vec<Meal>> {
    let records = repo::for_date(db, date.to_string(), limit, offset).await?;
    Ok(records.into_iter().map(Meal::from).collect())
}

/// Sum meal totals into one figure per nutrient. Pure; callers filter to the
/// date range they care about first.
pub fn daily_totals(meals: &[Meal]) -> DailyTotals {
    DailyTotals {
        calories: meals.iter().map(|m| m.total_calories).sum(),
        fats: meals.iter().map(|m| m.total_fat).sum(),
        protein: meals.iter().map(|m| m.total_protein).sum(),
        carbs: meals.iter().map(|m| m.total_carbs).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::dto::AddProductRequest;

    async fn test_db() -> (tempfile::TempDir, Db) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Db::open(dir.path().join("test.redb")).await.expect("open db");
        (dir, db)
    }

    async fn add_catalog_product(db: &Db, name: &str, calories: f64, fat: f64) -> u64 {
        products::services::add_product(
            db,
            AddProductRequest {
                name: Some(name.to_string()),
                calories: Some(calories.into()),
                fats: Some(fat.into()),
                protein: Some(10.0.into()),
                carbs: Some(20.0.into()),
            },
        )
        .await
        .expect("add product");
        let all = products::services::get_all_products(db).await.expect("list");
        all.iter().find(|p| p.name == name).expect("just added").id
    }

    #[test]
    fn calculate_nutrient_matches_fixed_point_rounding() {
        assert_eq!(calculate_nutrient(200.0, 150.0), 300.0);
        assert_eq!(calculate_nutrient(4.5, 33.0), 1.5);
        assert_eq!(calculate_nutrient(0.0, 100.0), 0.0);
        assert_eq!(calculate_nutrient(3.33, 10.0), 0.3);
    }

    #[test]
    fn daily_totals_of_nothing_is_all_zeros() {
        assert_eq!(daily_totals(&[]), DailyTotals::default());
    }

    #[test]
    fn daily_totals_sums_meal_totals() {
        let meal = |calories: f64, fat: f64| Meal {
            id: 0,
            date: "2024-05-01".to_string(),
            timestamp: 0,
            products: Vec::new(),
            total_calories: calories,
            total_protein: 1.0,
            total_carbs: 2.0,
            total_fat: fat,
        };
        let totals = daily_totals(&[meal(300.0, 10.0), meal(450.5, 12.5)]);
        assert_eq!(totals.calories, 750.5);
        assert_eq!(totals.fats, 22.5);
        assert_eq!(totals.protein, 2.0);
        assert_eq!(totals.carbs, 4.0);
    }

    #[tokio::test]
    async fn empty_meal_is_rejected() {
        let (_dir, db) = test_db().await;
        let err = add_meal(&db, Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "At least one product is required");
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (_dir, db) = test_db().await;
        let err = add_meal(
            &db,
            vec![MealLineRequest {
                product_id: 42,
                grams: 10.0,
            }],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::ProductNotFound(42)));
        assert_eq!(err.to_string(), "Product with ID 42 not found");
    }

    #[tokio::test]
    async fn non_positive_grams_are_rejected() {
        let (_dir, db) = test_db().await;
        let id = add_catalog_product(&db, "Oats", 370.0, 7.0).await;

        let err = add_meal(
            &db,
            vec![MealLineRequest {
                product_id: id,
                grams: 0.0,
            }],
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Grams must be a positive number");
    }

    #[tokio::test]
    async fn meal_totals_equal_sum_of_lines() {
        let (_dir, db) = test_db().await;
        let oats = add_catalog_product(&db, "Oats", 370.0, 7.0).await;
        let milk = add_catalog_product(&db, "Milk", 4.5, 3.6).await;

        add_meal(
            &db,
            vec![
                MealLineRequest {
                    product_id: oats,
                    grams: 50.0,
                },
                MealLineRequest {
                    product_id: milk,
                    grams: 33.0,
                },
            ],
        )
        .await
        .expect("add meal");

        let history = get_meal_history(&db, None).await.expect("history");
        assert_eq!(history.len(), 1);
        let meal = &history[0];
        assert_eq!(meal.products.len(), 2);

        // 4.5 per 100g over 33g rounds to the tenth.
        let milk_line = meal
            .products
            .iter()
            .find(|l| l.product_name == "Milk")
            .expect("milk line");
        assert_eq!(milk_line.calories, 1.5);

        let sum: f64 = meal.products.iter().map(|l| l.calories).sum();
        assert!((meal.total_calories - sum).abs() < 0.1);
        let sum: f64 = meal.products.iter().map(|l| l.fat).sum();
        assert!((meal.total_fat - sum).abs() < 0.1);
        let sum: f64 = meal.products.iter().map(|l| l.protein).sum();
        assert!((meal.total_protein - sum).abs() < 0.1);
        let sum: f64 = meal.products.iter().map(|l| l.carbs).sum();
        assert!((meal.total_carbs - sum).abs() < 0.1);
    }

    #[tokio::test]
    async fn line_snapshot_survives_product_deletion() {
        let (_dir, db) = test_db().await;
        let id = add_catalog_product(&db, "Cottage Cheese", 98.0, 4.3).await;

        add_meal(
            &db,
            vec![MealLineRequest {
                product_id: id,
                grams: 150.0,
            }],
        )
        .await
        .expect("add meal");

        products::services::delete_product(&db, id).await.expect("delete");

        let history = get_meal_history(&db, None).await.expect("history");
        assert_eq!(history[0].products[0].product_name, "Cottage Cheese");
        assert_eq!(history[0].products[0].product_id, id);
    }

    #[tokio::test]
    async fn history_respects_limit() {
        let (_dir, db) = test_db().await;
        let id = add_catalog_product(&db, "Rice", 360.0, 1.0).await;

        for _ in 0..3 {
            add_meal(
                &db,
                vec![MealLineRequest {
                    product_id: id,
                    grams: 100.0,
                }],
            )
            .await
            .expect("add meal");
        }

        assert_eq!(get_meal_history(&db, Some(2)).await.expect("history").len(), 2);
        assert_eq!(get_meal_history(&db, None).await.expect("history").len(), 3);
    }
}
