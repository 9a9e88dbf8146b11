//! `sites` table schema and the statements run against it

use crate::{DbLocation, Result, SiteRecord, StoreError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

pub const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS sites (
    id TEXT PRIMARY KEY,
    lat DOUBLE,
    lon DOUBLE,
    connection INT,
    curtailment INT,
    delay INT,
    created_at TIMESTAMP
);";

const INSERT_SQL: &str = "INSERT INTO sites (id, lat, lon, connection, curtailment, delay, created_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const SELECT_SQL: &str =
    "SELECT id, lat, lon, connection, curtailment, delay, created_at FROM sites WHERE id = ?1";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM sites";

/// Open a connection and create the table if it is missing
pub fn open_connection(location: &DbLocation) -> Result<Connection> {
    let conn = match location {
        DbLocation::File(path) => Connection::open(path)?,
        DbLocation::Memory => Connection::open_in_memory()?,
    };
    ensure_schema(&conn)?;
    Ok(conn)
}

pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn insert_site(conn: &Connection, record: &SiteRecord) -> Result<()> {
    conn.execute(
        INSERT_SQL,
        params![
            record.id.to_string(),
            record.lat,
            record.lon,
            record.connection,
            record.curtailment,
            record.delay,
            record.created_at,
        ],
    )?;
    Ok(())
}

pub fn find_site(conn: &Connection, id: &Uuid) -> Result<Option<SiteRecord>> {
    let raw = conn
        .query_row(SELECT_SQL, params![id.to_string()], RawSite::from_row)
        .optional()?;
    raw.map(RawSite::into_record).transpose()
}

pub fn count_sites(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row(COUNT_SQL, [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Row as stored, before the id is parsed
struct RawSite {
    id: String,
    lat: f64,
    lon: f64,
    connection: i64,
    curtailment: i64,
    delay: i64,
    created_at: DateTime<Utc>,
}

impl RawSite {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            lat: row.get(1)?,
            lon: row.get(2)?,
            connection: row.get(3)?,
            curtailment: row.get(4)?,
            delay: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<SiteRecord> {
        let id = Uuid::parse_str(&self.id).map_err(|_| StoreError::CorruptId(self.id.clone()))?;
        Ok(SiteRecord {
            id,
            lat: self.lat,
            lon: self.lon,
            connection: self.connection,
            curtailment: self.curtailment,
            delay: self.delay,
            created_at: self.created_at,
        })
    }
}
