use anyhow::Result;
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::info;

#[derive(Debug)]
struct Migration {
    name: &'static str,
    version: i32,
    up: fn(&rusqlite::Connection) -> rusqlite::Result<()>,
}

impl Migration {
    fn new(
        name: &'static str,
        version: i32,
        up: fn(&rusqlite::Connection) -> rusqlite::Result<()>,
    ) -> Self {
        Self { name, version, up }
    }
}

pub async fn initialize_database(db: &Connection) -> Result<()> {
    db.call(|conn| {
        // One row per page view
        conn.execute(
            "CREATE TABLE IF NOT EXISTS analytics (
                id INTEGER PRIMARY KEY,
                created_at INTEGER NOT NULL,
                path TEXT NOT NULL,
                user_agent TEXT NOT NULL DEFAULT '',
                referrer TEXT,
                session_id TEXT NOT NULL DEFAULT '',
                device_type TEXT
            )",
            [],
        )?;

        Ok(())
    })
    .await?;

    run_migrations(db).await?;

    Ok(())
}

fn get_migrations() -> Vec<Migration> {
    vec![
        Migration::new("Index analytics by created_at", 1, |conn| {
            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_analytics_created_at ON analytics(created_at)",
                [],
            )?;
            Ok(())
        }),
    ]
}

async fn run_migrations(db: &Connection) -> Result<()> {
    info!("Running database migrations...");

    db.call(|conn| {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS migrations (
                id INTEGER PRIMARY KEY,
                version INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                executed_at INTEGER NOT NULL
            )",
            [],
        )?;

        let executed_versions = conn
            .prepare("SELECT version FROM migrations")?
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i32>, rusqlite::Error>>()?;

        for migration in get_migrations() {
            if executed_versions.contains(&migration.version) {
                continue;
            }

            info!("Running migration {}: {}", migration.version, migration.name);

            let tx = conn.transaction()?;
            (migration.up)(&tx)?;
            tx.execute(
                "INSERT INTO migrations (version, name, executed_at)
                 VALUES (?1, ?2, unixepoch())",
                params![&migration.version, &migration.name],
            )?;
            tx.commit()?;

            info!("Migration {} completed successfully", migration.version);
        }

        Ok(())
    })
    .await?;

    info!("All database migrations completed successfully");
    Ok(())
}
