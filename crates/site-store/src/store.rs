//! Connection strategies behind [`SiteStore`]

use crate::schema::{count_sites, find_site, insert_site, open_connection};
use crate::{DbLocation, Result, SiteRecord, SiteStore};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Opens a fresh connection for every operation
#[derive(Debug, Clone)]
pub struct PerRequestStore {
    location: DbLocation,
}

impl PerRequestStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            location: DbLocation::File(path),
        }
    }

    /// Create the database file and table up front
    pub fn ensure_ready(&self) -> Result<()> {
        self.connect().map(drop)
    }

    fn connect(&self) -> Result<Connection> {
        debug!("Opening connection to {}", self.location);
        open_connection(&self.location)
    }
}

impl SiteStore for PerRequestStore {
    fn insert(&self, record: &SiteRecord) -> Result<()> {
        insert_site(&self.connect()?, record)
    }

    fn get(&self, id: &Uuid) -> Result<Option<SiteRecord>> {
        find_site(&self.connect()?, id)
    }

    fn count(&self) -> Result<u64> {
        count_sites(&self.connect()?)
    }
}

/// Single long-lived connection
pub struct SharedStore {
    conn: Mutex<Connection>,
}

impl SharedStore {
    pub fn open(location: &DbLocation) -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(open_connection(location)?),
        })
    }

    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock();
        op(&conn)
    }
}

impl SiteStore for SharedStore {
    fn insert(&self, record: &SiteRecord) -> Result<()> {
        self.with_conn(|conn| insert_site(conn, record))
    }

    fn get(&self, id: &Uuid) -> Result<Option<SiteRecord>> {
        self.with_conn(|conn| find_site(conn, id))
    }

    fn count(&self) -> Result<u64> {
        self.with_conn(count_sites)
    }
}
