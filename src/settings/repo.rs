use tokio::task;
use tracing::debug;

use crate::db::{Db, SETTINGS, SETTINGS_KEY};
use crate::error::Result;

use super::dto::Settings;

/// Insert-or-replace the single settings record. Last write wins.
pub async fn save(db: &Db, settings: Settings) -> Result<()> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS)?;
            table.insert(SETTINGS_KEY, serde_json::to_vec(&settings)?.as_slice())?;
        }
        txn.commit()?;

        debug!("settings saved");
        Ok(())
    })
    .await?
}

/// Point lookup under the fixed key; `None` if never saved.
pub async fn get(db: &Db) -> Result<Option<Settings>> {
    let db = db.clone();
    task::spawn_blocking(move || {
        let txn = db.raw().begin_read()?;
        let table = txn.open_table(SETTINGS)?;
        match table.get(SETTINGS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_slice::<Settings>(raw.value())?)),
            None => Ok(None),
        }
    })
    .await?
}
