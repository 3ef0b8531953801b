use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use tracing::debug;

use crate::error::Result;

/// Stored records are serde_json bytes keyed by a store-assigned id.
pub(crate) const PRODUCTS: TableDefinition<u64, &[u8]> = TableDefinition::new("products");
/// Secondary index: (lowercased name, product id) -> (). Non-unique by
/// construction since the id is part of the key.
pub(crate) const PRODUCT_NAME_INDEX: TableDefinition<(&str, u64), ()> =
    TableDefinition::new("product_name_index");
pub(crate) const MEALS: TableDefinition<u64, &[u8]> = TableDefinition::new("meals");
/// Secondary index: (ISO date, meal id) -> ().
pub(crate) const MEAL_DATE_INDEX: TableDefinition<(&str, u64), ()> =
    TableDefinition::new("meal_date_index");
/// Single-record table; the only key is [`SETTINGS_KEY`].
pub(crate) const SETTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");
/// Schema version and id sequences.
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

pub(crate) const SETTINGS_KEY: &str = "user-settings";

const SCHEMA_VERSION_KEY: &str = "schema_version";
const SCHEMA_VERSION: u64 = 1;

/// Handle to the embedded database.
///
/// Cloning is cheap (shared `Arc`); every clone refers to the same store.
/// A `Db` only exists once schema setup has completed, so holders never
/// observe a half-initialized store.
#[derive(Clone)]
pub struct Db {
    inner: Arc<Database>,
}

impl Db {
    /// Open (or create) the database at `path` and ensure the schema.
    ///
    /// Idempotent: tables are created only if absent and the stored schema
    /// version is only ever raised, so re-opening an existing file preserves
    /// its contents.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let db = tokio::task::spawn_blocking(move || Self::open_sync(&path)).await??;
        Ok(db)
    }

    fn open_sync(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            txn.open_table(PRODUCTS)?;
            txn.open_table(PRODUCT_NAME_INDEX)?;
            txn.open_table(MEALS)?;
            txn.open_table(MEAL_DATE_INDEX)?;
            txn.open_table(SETTINGS)?;

            let mut meta = txn.open_table(META)?;
            let stored = meta
                .get(SCHEMA_VERSION_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0);
            if stored < SCHEMA_VERSION {
                meta.insert(SCHEMA_VERSION_KEY, SCHEMA_VERSION)?;
            }
        }
        txn.commit()?;

        debug!(path = %path.display(), "database opened");
        Ok(Self {
            inner: Arc::new(db),
        })
    }

    pub(crate) fn raw(&self) -> &Database {
        &self.inner
    }
}

/// Allocate the next id from a named sequence, within the caller's write
/// transaction so the allocation commits (or aborts) with the insert.
/// Sequences only ever grow; deletions never free an id for reuse.
pub(crate) fn next_id(txn: &WriteTransaction, sequence: &str) -> Result<u64> {
    let mut meta = txn.open_table(META)?;
    let id = meta.get(sequence)?.map(|guard| guard.value()).unwrap_or(0) + 1;
    meta.insert(sequence, id)?;
    Ok(id)
}
