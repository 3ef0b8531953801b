use redb::ReadableTable;
use tokio::task;
use tracing::debug;

use crate::db::{self, Db, PRODUCTS, PRODUCT_NAME_INDEX};
use crate::error::Result;

use super::repo_types::{NewProduct, ProductRecord};

const PRODUCT_SEQ: &str = "products.seq";

/// Insert a product and its name-index entry in one write transaction.
pub async fn insert(db: &Db, product: NewProduct) -> Result<ProductRecord> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_write()?;
        let record = {
            let id = db::next_id(&txn, PRODUCT_SEQ)?;
            let record = ProductRecord {
                id,
                name: product.name,
                name_lower: product.name_lower,
                calories: product.calories,
                protein: product.protein,
                carbs: product.carbs,
                fat: product.fat,
            };

            let mut products = txn.open_table(PRODUCTS)?;
            products.insert(id, serde_json::to_vec(&record)?.as_slice())?;

            let mut index = txn.open_table(PRODUCT_NAME_INDEX)?;
            index.insert((record.name_lower.as_str(), id), ())?;

            record
        };
        txn.commit()?;

        debug!(id = record.id, "product inserted");
        Ok(record)
    })
    .await?
}

/// Range scan over the name index: every product whose lowercased name
/// starts with `prefix`. An empty prefix matches everything.
pub async fn search_by_prefix(db: &Db, prefix: String) -> Result<Vec<ProductRecord>> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_read()?;
        let index = txn.open_table(PRODUCT_NAME_INDEX)?;
        let products = txn.open_table(PRODUCTS)?;

        let mut out = Vec::new();
        for entry in index.range((prefix.as_str(), 0u64)..)? {
            let (key, _) = entry?;
            let (name_lower, id) = key.value();
            if !name_lower.starts_with(prefix.as_str()) {
                break;
            }
            if let Some(raw) = products.get(id)? {
                out.push(serde_json::from_slice::<ProductRecord>(raw.value())?);
            }
        }
        Ok(out)
    })
    .await?
}

/// Full scan of the products table, in key (insertion-id) order.
pub async fn list_all(db: &Db) -> Result<Vec<ProductRecord>> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_read()?;
        let products = txn.open_table(PRODUCTS)?;

        let mut out = Vec::new();
        for entry in products.iter()? {
            let (_, raw) = entry?;
            out.push(serde_json::from_slice::<ProductRecord>(raw.value())?);
        }
        Ok(out)
    })
    .await?
}

/// Remove a product and its index entry. Meals that reference the product
/// keep their denormalized name snapshot; there is no cascade.
pub async fn delete(db: &Db, id: u64) -> Result<()> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_write()?;
        {
            let removed = {
                let mut products = txn.open_table(PRODUCTS)?;
                // Deserialize into a local so the access guard returned by
                // `remove` drops before the table does.
                let record = match products.remove(id)? {
                    Some(raw) => Some(serde_json::from_slice::<ProductRecord>(raw.value())?),
                    None => None,
                };
                record
            };
            if let Some(record) = removed {
                let mut index = txn.open_table(PRODUCT_NAME_INDEX)?;
                index.remove((record.name_lower.as_str(), id))?;
            }
        }
        txn.commit()?;

        debug!(id, "product deleted");
        Ok(())
    })
    .await?
}
