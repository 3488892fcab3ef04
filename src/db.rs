use log::{error, info};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Build, Rocket};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::store::ClassDirectory;

static MIGRATOR: Migrator = sqlx::migrate!("db/migrations"); // Auto-discovers migrations in `db/migrations/`

// distinct database name per rocket instance, so parallel tests stay isolated
static TEST_DB_SEQ: AtomicU32 = AtomicU32::new(0);

pub struct DbPool(pub SqlitePool);

pub struct DbPoolFairing();
#[rocket::async_trait]
impl Fairing for DbPoolFairing {
    fn info(&self) -> Info {
        Info {
            name: "SQLite Database Pool with Migrations",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let database_url = if cfg!(test) {
            // a plain `:memory:` database exists per connection, so pooled
            // statements would each see an empty schema; a named shared-cache
            // database is visible to every connection of this pool
            let n = TEST_DB_SEQ.fetch_add(1, Ordering::Relaxed);
            format!("sqlite:file:tutorhubd_test_{n}?mode=memory&cache=shared")
        } else {
            let figment = rocket.figment();
            let database_url = figment.extract_inner::<String>("database_url").expect("database_url");
            if database_url.starts_with("sqlite://") {
                let db_path = database_url.trim_start_matches("sqlite://");
                if !Path::new(db_path).exists() {
                    std::fs::File::create(db_path).expect("Failed to create SQLite database file");
                }
            }
            database_url
        };

        info!("Opening database: {database_url}");
        let opts = SqliteConnectOptions::from_str(&database_url).expect("valid sqlite url")
            .journal_mode(SqliteJournalMode::Wal) // use WAL for better concurrency
            .pragma("foreign_keys", "true");
        // the shared in-memory database lives only while a connection is open
        let min_connections = if cfg!(test) { 1 } else { 0 };
        let pool = match SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(min_connections)
            .connect_with(opts)
            .await
        {
            Ok(pool) => pool,
            Err(err) => {
                error!("Database connection error: {:?}", err);
                return Err(rocket);
            }
        };

        match MIGRATOR.run(&pool).await {
            Ok(_) => info!("Migrations applied successfully!"),
            Err(err) => {
                error!("Migration error: {:?}", err);
                return Err(rocket);
            }
        };

        let directory = ClassDirectory::new(pool.clone());
        Ok(rocket.manage(directory).manage(DbPool(pool)))
    }
}
