//! Database schema management.

use rusqlite::Connection;
use tokio_rusqlite::Error;

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
-- One record per domain; the record column holds the mapping as JSON.
CREATE TABLE IF NOT EXISTS form_mappings (
    domain TEXT PRIMARY KEY,
    record TEXT NOT NULL
);

-- Detection verdicts, also one per domain and stored as JSON.
CREATE TABLE IF NOT EXISTS form_detections (
    domain TEXT PRIMARY KEY,
    record TEXT NOT NULL
);
"#;
