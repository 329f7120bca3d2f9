use anyhow::Context;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .context("Failed to open database")?;

    let applied = store.migrate().await.context("Migration failed")?;

    if applied == 0 {
        println!("Database is up to date.");
    } else {
        println!("✓ Applied {applied} migration(s)");
    }
    Ok(())
}
