//! Site Store
//!
//! Persistence accessor for analyzed grid sites. A single `sites` table in an
//! embedded SQLite database, created on first use.
//!
//! The connection strategy is chosen by configuration:
//!
//! | Mode | Behaviour |
//! |------|-----------|
//! | `PerRequest` | every operation opens its own connection and ensures the table |
//! | `Shared`     | one long-lived connection behind a mutex |
//!
//! In-memory databases only live as long as their connection, so they require
//! `Shared`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub mod schema;
pub mod store;

pub use store::{PerRequestStore, SharedStore};

/// Path keyword selecting an in-memory database
pub const MEMORY_PATH: &str = ":memory:";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored site id is not a UUID: {0}")]
    CorruptId(String),
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

impl DbLocation {
    /// `":memory:"` selects an in-memory database, anything else is a file path
    pub fn parse(raw: &str) -> Self {
        if raw == MEMORY_PATH {
            Self::Memory
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DbLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(MEMORY_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionMode {
    #[default]
    PerRequest,
    Shared,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub location: DbLocation,
    pub mode: ConnectionMode,
}

impl StoreConfig {
    pub fn new(location: DbLocation, mode: ConnectionMode) -> Self {
        Self { location, mode }
    }

    /// Shared in-memory database, used by tests
    pub fn in_memory() -> Self {
        Self::new(DbLocation::Memory, ConnectionMode::Shared)
    }
}

/// One analyzed coordinate pair and its risk metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: Uuid,
    pub lat: f64,
    pub lon: f64,
    pub connection: i64,
    pub curtailment: i64,
    pub delay: i64,
    pub created_at: DateTime<Utc>,
}

impl SiteRecord {
    /// Fresh record with a new v4 id, stamped now
    pub fn new(lat: f64, lon: f64, connection: i64, curtailment: i64, delay: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            lat,
            lon,
            connection,
            curtailment,
            delay,
            created_at: Utc::now(),
        }
    }
}

/// Storage seam used by the gateway
pub trait SiteStore: Send + Sync {
    fn insert(&self, record: &SiteRecord) -> Result<()>;

    fn get(&self, id: &Uuid) -> Result<Option<SiteRecord>>;

    fn count(&self) -> Result<u64>;
}

/// Build the configured store and make sure the schema exists
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn SiteStore>> {
    let store: Arc<dyn SiteStore> = match (config.mode, &config.location) {
        (ConnectionMode::PerRequest, DbLocation::Memory) => {
            return Err(StoreError::InvalidConfig(
                "in-memory databases require the shared connection mode".into(),
            ));
        }
        (ConnectionMode::PerRequest, DbLocation::File(path)) => {
            let store = PerRequestStore::new(path.clone());
            store.ensure_ready()?;
            Arc::new(store)
        }
        (ConnectionMode::Shared, location) => Arc::new(SharedStore::open(location)?),
    };

    info!("Site store ready at {} ({:?})", config.location, config.mode);
    Ok(store)
}
