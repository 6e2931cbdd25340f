/**
 * Store Configuration
 *
 * Chooses where messages and users live. With a reachable `DATABASE_URL`
 * the Postgres stores are used and migrations are applied; otherwise the
 * server runs on in-memory stores, which lose everything on restart.
 */

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::auth::directory::{InMemoryDirectory, UserDirectory};
use crate::backend::auth::users::PgUserDirectory;
use crate::backend::messaging::archive::{InMemoryArchive, MessageArchive};
use crate::backend::messaging::db::PgMessageArchive;

/// The two external stores the core depends on
pub struct Stores {
    pub directory: Arc<dyn UserDirectory>,
    pub archive: Arc<dyn MessageArchive>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            directory: Arc::new(InMemoryDirectory::new()),
            archive: Arc::new(InMemoryArchive::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            directory: Arc::new(PgUserDirectory::new(pool.clone())),
            archive: Arc::new(PgMessageArchive::new(pool)),
        }
    }
}

/// Connect to Postgres and run migrations
///
/// Returns `None` when the connection fails. A migration failure is
/// logged and the pool is still returned, since the schema may already
/// be in place.
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            return None;
        }
    };
    tracing::info!("Database connection pool created successfully");

    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Pick the stores for a configuration
pub async fn load_stores(database_url: Option<&str>) -> Stores {
    match database_url {
        Some(url) => match load_database(url).await {
            Some(pool) => Stores::postgres(pool),
            None => {
                tracing::warn!("Database unavailable, falling back to in-memory stores");
                Stores::in_memory()
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            Stores::in_memory()
        }
    }
}
