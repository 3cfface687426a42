//! SQLite Database
//!
//! The intake record store: one append-only table using rusqlite with r2d2
//! connection pooling. Rows are addressed by `row_index` or by the natural
//! key (phone + birthdate), newest first.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use saju_intake_core::{normalize_birthdate, JobStatus, LookupKey, ParsedSections};

use crate::models::intake::{IntakeRecord, NewIntake};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::database_path;

/// Name of the intake table
pub const INTAKE_TABLE: &str = "intake_records";

/// Processing and result columns, in the order they are appended to the
/// table when missing.
pub const RESULT_COLUMNS: [(&str, &str); 8] = [
    ("ai_status", "TEXT NOT NULL DEFAULT 'PENDING'"),
    ("ai_processed_at", "TEXT"),
    ("summary", "TEXT NOT NULL DEFAULT ''"),
    ("health", "TEXT NOT NULL DEFAULT ''"),
    ("foods", "TEXT NOT NULL DEFAULT ''"),
    ("avoid", "TEXT NOT NULL DEFAULT ''"),
    ("product_keywords", "TEXT NOT NULL DEFAULT ''"),
    ("promo", "TEXT NOT NULL DEFAULT ''"),
];

const SELECT_RECORD: &str = "SELECT row_index, created_at, source, name, phone, birthdate,
        birthtime, calendar_type, gender, memo, user_agent, ai_status, ai_processed_at,
        summary, health, foods, avoid, product_keywords, promo
     FROM intake_records";

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database service for the intake record store
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Wrap an existing connection pool, creating or upgrading the schema.
    pub fn with_pool(pool: DbPool) -> AppResult<Self> {
        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database.
    ///
    /// Single-connection pool, so every caller sees the same data.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        Self::with_pool(pool)
    }

    /// Open the database at the default location (~/.saju-intake/intake.db)
    pub fn new() -> AppResult<Self> {
        Self::open(&database_path()?)
    }

    /// Open (or create) the database file at `db_path`
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        Self::with_pool(pool)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS intake_records (
                row_index INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                source TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                birthdate TEXT NOT NULL,
                birthtime TEXT NOT NULL DEFAULT '',
                calendar_type TEXT NOT NULL,
                gender TEXT NOT NULL,
                memo TEXT NOT NULL DEFAULT '',
                user_agent TEXT NOT NULL DEFAULT ''
            )",
            [],
        )?;

        Self::ensure_result_columns(&conn)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_intake_records_phone
             ON intake_records(phone, row_index DESC)",
            [],
        )?;

        Ok(())
    }

    /// Append any missing processing/result columns, never reordering
    /// existing ones.
    fn ensure_result_columns(conn: &rusqlite::Connection) -> AppResult<()> {
        for (column, definition) in RESULT_COLUMNS {
            if !Self::table_has_column(conn, INTAKE_TABLE, column) {
                tracing::info!(column, "adding missing column to intake table");
                conn.execute(
                    &format!(
                        "ALTER TABLE {} ADD COLUMN {} {}",
                        INTAKE_TABLE, column, definition
                    ),
                    [],
                )?;
            }
        }
        Ok(())
    }

    /// Check whether a table has a given column (via PRAGMA table_info).
    fn table_has_column(conn: &rusqlite::Connection, table: &str, column: &str) -> bool {
        let sql = format!("PRAGMA table_info({})", table);
        if let Ok(mut stmt) = conn.prepare(&sql) {
            if let Ok(rows) = stmt.query_map([], |row| row.get::<_, String>(1)) {
                for row in rows.flatten() {
                    if row == column {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Column names of the intake table, in table order
    pub fn intake_columns(&self) -> AppResult<Vec<String>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", INTAKE_TABLE))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Get the connection pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Check if the database is healthy
    pub fn is_healthy(&self) -> bool {
        if let Ok(conn) = self.pool.get() {
            conn.query_row("SELECT 1", [], |_| Ok(())).is_ok()
        } else {
            false
        }
    }

    // ========================================================================
    // Intake Operations
    // ========================================================================

    /// Append a new PENDING record and return its row index
    pub fn insert_intake(&self, intake: &NewIntake) -> AppResult<i64> {
        let conn = self.get_connection()?;
        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO intake_records (created_at, source, name, phone, birthdate, birthtime,
                calendar_type, gender, memo, user_agent, ai_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'PENDING')",
            params![
                created_at,
                intake.source,
                intake.name,
                intake.phone,
                intake.birthdate,
                intake.birthtime,
                intake.calendar_type,
                intake.gender,
                intake.memo,
                intake.user_agent,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a single record by row index
    pub fn get_record(&self, row_index: i64) -> AppResult<Option<IntakeRecord>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            &format!("{} WHERE row_index = ?1", SELECT_RECORD),
            params![row_index],
            Self::row_to_record,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Most recent record matching the natural key.
    ///
    /// Scans the phone's rows newest first and compares stored birthdates
    /// after normalization, so rows written with a leading apostrophe or a
    /// time suffix still match.
    pub fn find_latest_by_key(&self, key: &LookupKey) -> AppResult<Option<IntakeRecord>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE phone = ?1 ORDER BY row_index DESC",
            SELECT_RECORD
        ))?;

        let rows = stmt.query_map(params![key.phone], Self::row_to_record)?;
        for row in rows {
            let record = row?;
            if normalize_birthdate(&record.birthdate) == key.birthdate {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Mark a PENDING record DONE and store its sections.
    ///
    /// Returns false when the record is missing or already terminal.
    pub fn complete_record(&self, row_index: i64, sections: &ParsedSections) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let changed = conn.execute(
            "UPDATE intake_records SET ai_status = 'DONE', ai_processed_at = ?2,
                summary = ?3, health = ?4, foods = ?5, avoid = ?6,
                product_keywords = ?7, promo = ?8
             WHERE row_index = ?1 AND ai_status = 'PENDING'",
            params![
                row_index,
                chrono::Utc::now().to_rfc3339(),
                sections.summary,
                sections.health,
                sections.foods,
                sections.avoid,
                sections.product_keywords,
                sections.promo,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Mark a PENDING record ERROR with a diagnostic in the summary column.
    ///
    /// The other result columns are cleared. Returns false when the record is
    /// missing or already terminal.
    pub fn fail_record(&self, row_index: i64, message: &str) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let changed = conn.execute(
            "UPDATE intake_records SET ai_status = 'ERROR', ai_processed_at = ?2,
                summary = ?3, health = '', foods = '', avoid = '',
                product_keywords = '', promo = ''
             WHERE row_index = ?1 AND ai_status = 'PENDING'",
            params![row_index, chrono::Utc::now().to_rfc3339(), message],
        )?;
        Ok(changed > 0)
    }

    /// Total number of intake records
    pub fn count_records(&self) -> AppResult<i64> {
        let conn = self.get_connection()?;
        let count = conn.query_row("SELECT COUNT(*) FROM intake_records", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<IntakeRecord> {
        let status_text: String = row.get(11)?;
        let status = status_text.parse::<JobStatus>().unwrap_or_else(|_| {
            tracing::warn!(status = %status_text, "unknown stored status, treating as pending");
            JobStatus::Pending
        });

        Ok(IntakeRecord {
            row_index: row.get(0)?,
            created_at: row.get(1)?,
            source: row.get(2)?,
            name: row.get(3)?,
            phone: row.get(4)?,
            birthdate: row.get(5)?,
            birthtime: row.get(6)?,
            calendar_type: row.get(7)?,
            gender: row.get(8)?,
            memo: row.get(9)?,
            user_agent: row.get(10)?,
            status,
            processed_at: row.get(12)?,
            sections: ParsedSections {
                summary: row.get(13)?,
                health: row.get(14)?,
                foods: row.get(15)?,
                avoid: row.get(16)?,
                product_keywords: row.get(17)?,
                promo: row.get(18)?,
            },
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("pool_size", &self.pool.state().connections)
            .finish()
    }
}
