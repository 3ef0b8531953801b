use tracing::debug;

use crate::db::Db;
use crate::error::{Error, Result};

use super::dto::{AddProductRequest, NumberOrText, Product};
use super::repo;
use super::repo_types::NewProduct;

/// A nutrient field counts as present only if it parses to a finite
/// non-zero number; blank, missing, unparseable, zero, NaN and infinity
/// all mean "not filled in".
fn nutrient_value(field: &Option<NumberOrText>) -> Option<f64> {
    field
        .as_ref()
        .and_then(NumberOrText::as_f64)
        .filter(|v| v.is_finite() && *v != 0.0)
}

/// Validate and store a new product.
///
/// The name is trimmed and the lowercase search key derived here, so the
/// repository only ever sees normalized records.
pub async fn add_product(db: &Db, request: AddProductRequest) -> Result<()> {
    let name = request.name.as_deref().map(str::trim).unwrap_or("");

    let (Some(calories), Some(fat), Some(protein), Some(carbs)) = (
        nutrient_value(&request.calories),
        nutrient_value(&request.fats),
        nutrient_value(&request.protein),
        nutrient_value(&request.carbs),
    ) else {
        return Err(Error::validation("All nutritional values are required"));
    };
    if name.is_empty() {
        return Err(Error::validation("All nutritional values are required"));
    }

    if calories < 0.0 || fat < 0.0 || protein < 0.0 || carbs < 0.0 {
        return Err(Error::validation(
            "Nutritional values must be positive numbers",
        ));
    }

    let record = repo::insert(
        db,
        NewProduct {
            name: name.to_string(),
            name_lower: name.to_lowercase(),
            calories,
            protein,
            carbs,
            fat,
        },
    )
    .await?;

    debug!(id = record.id, name = %record.name, "product added");
    Ok(())
}

/// Case-insensitive prefix search over product names.
pub async fn search_products(db: &Db, query: &str) -> Result<Vec<Product>> {
    let prefix = query.trim().to_lowercase();
    let records = repo::search_by_prefix(db, prefix).await?;
    Ok(records.into_iter().map(Product::from).collect())
}

pub async fn get_all_products(db: &Db) -> Result<Vec<Product>> {
    let records = repo::list_all(db).await?;
    Ok(records.into_iter().map(Product::from).collect())
}

pub async fn delete_product(db: &Db, id: u64) -> Result<()> {
    repo::delete(db, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (tempfile::TempDir, Db) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = Db::open(dir.path().join("test.redb")).await.expect("open db");
        (dir, db)
    }

    fn valid_request(name: &str) -> AddProductRequest {
        AddProductRequest {
            name: Some(name.to_string()),
            calories: Some(100.0.into()),
            fats: Some(10.0.into()),
            protein: Some(20.0.into()),
            carbs: Some(30.0.into()),
        }
    }

    #[tokio::test]
    async fn missing_field_fails_and_never_reaches_storage() {
        let (_dir, db) = test_db().await;

        let request = AddProductRequest {
            carbs: None,
            ..valid_request("Cheese")
        };
        let err = add_product(&db, request).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "All nutritional values are required");

        assert!(get_all_products(&db).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn zero_counts_as_missing() {
        let (_dir, db) = test_db().await;

        let request = AddProductRequest {
            fats: Some(0.0.into()),
            ..valid_request("Water")
        };
        let err = add_product(&db, request).await.unwrap_err();
        assert_eq!(err.to_string(), "All nutritional values are required");
    }

    #[tokio::test]
    async fn negative_values_are_rejected() {
        let (_dir, db) = test_db().await;

        let request = AddProductRequest {
            protein: Some((-5.0).into()),
            ..valid_request("Cheese")
        };
        let err = add_product(&db, request).await.unwrap_err();
        assert_eq!(err.to_string(), "Nutritional values must be positive numbers");
        assert!(get_all_products(&db).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn string_input_is_coerced() {
        let (_dir, db) = test_db().await;

        let request = AddProductRequest {
            name: Some("  Greek Yogurt  ".to_string()),
            calories: Some("59".into()),
            fats: Some("0.4".into()),
            protein: Some("10.2".into()),
            carbs: Some("3.6".into()),
        };
        add_product(&db, request).await.expect("add");

        let products = get_all_products(&db).await.expect("list");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Greek Yogurt");
        assert_eq!(products[0].calories, 59.0);
        assert_eq!(products[0].protein, 10.2);
    }

    #[tokio::test]
    async fn non_finite_values_count_as_missing() {
        let (_dir, db) = test_db().await;

        // "NaN" parses to a float in Rust; it must still not reach storage.
        let request = AddProductRequest {
            calories: Some("NaN".into()),
            ..valid_request("Mystery Meat")
        };
        let err = add_product(&db, request).await.unwrap_err();
        assert_eq!(err.to_string(), "All nutritional values are required");

        let request = AddProductRequest {
            protein: Some(f64::INFINITY.into()),
            ..valid_request("Mystery Meat")
        };
        let err = add_product(&db, request).await.unwrap_err();
        assert_eq!(err.to_string(), "All nutritional values are required");

        assert!(get_all_products(&db).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn unparseable_string_counts_as_missing() {
        let (_dir, db) = test_db().await;

        let request = AddProductRequest {
            calories: Some("lots".into()),
            ..valid_request("Cheese")
        };
        let err = add_product(&db, request).await.unwrap_err();
        assert_eq!(err.to_string(), "All nutritional values are required");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_prefix_match() {
        let (_dir, db) = test_db().await;
        for name in ["Cheddar", "cherries", "CHICKEN breast", "Milk"] {
            add_product(&db, valid_request(name)).await.expect("add");
        }

        let hits = search_products(&db, "ch").await.expect("search");
        assert_eq!(hits.len(), 3);

        let hits = search_products(&db, "CHE").await.expect("search");
        let mut names: Vec<_> = hits.into_iter().map(|p| p.name).collect();
        names.sort();
        assert_eq!(names, ["Cheddar", "cherries"]);

        assert!(search_products(&db, "zz").await.expect("search").is_empty());
    }
}
