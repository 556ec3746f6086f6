//! SQLite stores.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::debug;

use formsense_protocols::detection::FormDetection;
use formsense_protocols::error::StoreError;
use formsense_protocols::mapping::FormMapping;
use formsense_protocols::store::{DetectionStore, MappingStore};

use crate::schema::init_schema;

async fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    debug!("opening database at {}", path.display());
    let conn = Connection::open(path)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    apply_schema(&conn).await?;
    Ok(conn)
}

async fn memory_connection() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    apply_schema(&conn).await?;
    Ok(conn)
}

async fn apply_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.call(|conn| Ok(init_schema(conn)?))
        .await
        .map_err(|e| StoreError::Query(e.to_string()))
}

/// Durable mapping store keyed by domain. Records are stored as JSON so
/// mapping shape changes do not require migrations.
pub struct SqliteMappingStore {
    conn: Connection,
}

impl SqliteMappingStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: memory_connection().await?,
        })
    }

    /// Create or open a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_connection(path.as_ref()).await?,
        })
    }

    /// Handle to the underlying connection, for stores sharing the
    /// same database file.
    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }
}

#[async_trait]
impl MappingStore for SqliteMappingStore {
    async fn find(&self, domain: &str) -> Result<Option<FormMapping>, StoreError> {
        let domain = domain.to_string();
        let record: Option<String> = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT record FROM form_mappings WHERE domain = ?1")?;
                match stmt.query_row([&domain], |row| row.get(0)) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        record
            .map(|record| {
                serde_json::from_str(&record).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn save(&self, mapping: FormMapping) -> Result<FormMapping, StoreError> {
        let domain = mapping.domain.clone();
        let record = serde_json::to_string(&mapping)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Insert and read back in one connection call, so two first-time
        // saves for the same domain both come back with the winning row.
        let stored: String = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO form_mappings (domain, record) VALUES (?1, ?2)",
                    params![domain, record],
                )?;
                let mut stmt =
                    conn.prepare("SELECT record FROM form_mappings WHERE domain = ?1")?;
                Ok(stmt.query_row([&domain], |row| row.get(0))?)
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        serde_json::from_str(&stored).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Durable detection store. Shares the mapping database; saves replace
/// the existing record so verdicts can be revised.
pub struct SqliteDetectionStore {
    conn: Connection,
}

impl SqliteDetectionStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: memory_connection().await?,
        })
    }

    /// Create or open a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_connection(path.as_ref()).await?,
        })
    }

    /// Reuse a connection whose schema is already applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DetectionStore for SqliteDetectionStore {
    async fn find(&self, domain: &str) -> Result<Option<FormDetection>, StoreError> {
        let domain = domain.to_string();
        let record: Option<String> = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT record FROM form_detections WHERE domain = ?1")?;
                match stmt.query_row([&domain], |row| row.get(0)) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        record
            .map(|record| {
                serde_json::from_str(&record).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn save(&self, detection: FormDetection) -> Result<FormDetection, StoreError> {
        let domain = detection.domain.clone();
        let record = serde_json::to_string(&detection)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO form_detections (domain, record) VALUES (?1, ?2)
                     ON CONFLICT(domain) DO UPDATE SET record = excluded.record",
                    params![domain, record],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(detection)
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
