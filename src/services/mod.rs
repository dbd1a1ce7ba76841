pub mod assignment;
pub mod availability;
pub mod distance;
pub mod lock_manager;
pub mod validation;

use std::sync::Arc;

use crate::config::{database, Config};
use crate::repository::{InMemoryStore, PgStore, Store};

pub use assignment::AssignmentService;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub assignment: AssignmentService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let assignment = AssignmentService::new(store.clone(), config.service());
        Self {
            config,
            store,
            assignment,
        }
    }

    /// Connects to Postgres when a database URL is configured, otherwise starts empty in
    /// memory.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.database_url.as_deref() {
            Some(url) => {
                let pool = database::create_pool(url, config.db_max_connections).await?;
                database::init_db(&pool).await?;
                tracing::info!("Using PostgreSQL store");
                Arc::new(PgStore::new(pool))
            }
            None => {
                tracing::warn!("No database configured, using in-memory store");
                Arc::new(InMemoryStore::new())
            }
        };
        Ok(Self::new(store, config))
    }
}
