use crate::errors::{AppError, AppResult};
use crate::models::{ChurchDetail, ChurchRecord, Dataset, ImportSummary, NewChurch, PopulationRecord};
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("schema.sql");

#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl Database {
    pub fn new(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(AppError::from)?;
        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::from)?;
        Self::with_connection(conn, None)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>) -> AppResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL).map_err(AppError::from)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn insert_church(&self, church: &NewChurch) -> AppResult<()> {
        let mut conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        let tx = conn.transaction()?;
        insert_church_rows(&tx, church)?;
        tx.commit()?;
        Ok(())
    }

    pub fn insert_population_record(&self, record: &PopulationRecord) -> AppResult<i64> {
        let conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        conn.execute(
            "INSERT INTO population (century, event, population) VALUES (?1, ?2, ?3)",
            params![record.century, record.event, record.population],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Loads a whole dataset atomically; nothing is written if any row fails.
    pub fn import_dataset(&self, dataset: &Dataset) -> AppResult<ImportSummary> {
        let mut conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        let tx = conn.transaction()?;
        for church in &dataset.churches {
            insert_church_rows(&tx, church)?;
        }
        for record in &dataset.population {
            tx.execute(
                "INSERT INTO population (century, event, population) VALUES (?1, ?2, ?3)",
                params![record.century, record.event, record.population],
            )?;
        }
        tx.commit()?;

        let summary = ImportSummary {
            churches: dataset.churches.len(),
            population_records: dataset.population.len(),
        };
        tracing::info!(
            churches = summary.churches,
            population_records = summary.population_records,
            "dataset imported"
        );
        Ok(summary)
    }

    pub fn list_built_centuries(&self) -> AppResult<Vec<ChurchRecord>> {
        let conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        let mut statement = conn.prepare("SELECT cid, built_century FROM churches ORDER BY cid ASC")?;
        let rows = statement
            .query_map([], parse_church_record_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Churches whose dedication contains `pattern` (SQL `LIKE`, case-insensitive for ASCII).
    pub fn list_dedicated_centuries(&self, pattern: &str) -> AppResult<Vec<ChurchRecord>> {
        let conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        let mut statement = conn.prepare(
            "SELECT m.cid, m.built_century
             FROM churches m
             JOIN church_details d ON m.cid = d.cid
             WHERE d.dedication LIKE ?1
             ORDER BY m.cid ASC",
        )?;
        let rows = statement
            .query_map([format!("%{}%", pattern)], parse_church_record_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_population_records(&self) -> AppResult<Vec<PopulationRecord>> {
        let conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        let mut statement = conn.prepare(
            "SELECT CAST(century AS INTEGER), event, population FROM population ORDER BY id ASC",
        )?;
        let rows = statement
            .query_map([], |row| {
                Ok(PopulationRecord {
                    century: row.get(0)?,
                    event: row.get(1)?,
                    population: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_distinct_built_centuries(&self) -> AppResult<Vec<i32>> {
        let conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        let mut statement = conn.prepare(
            "SELECT DISTINCT built_century FROM churches
             WHERE built_century IS NOT NULL
             ORDER BY built_century ASC",
        )?;
        let rows = statement
            .query_map([], |row| row.get::<_, i32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_church_details(&self, century: i32) -> AppResult<Vec<ChurchDetail>> {
        let conn = self.conn.lock().map_err(|_| AppError::Internal("database mutex poisoned".to_string()))?;
        let mut statement = conn.prepare(
            "SELECT m.english_name, m.address, d.architect, d.dedication, d.artists
             FROM churches m
             JOIN church_details d ON m.cid = d.cid
             WHERE m.built_century = ?1
             ORDER BY m.english_name ASC",
        )?;
        let rows = statement
            .query_map([century], |row| {
                Ok(ChurchDetail {
                    english_name: row.get(0)?,
                    address: row.get(1)?,
                    architect: row.get(2)?,
                    dedication: row.get(3)?,
                    artists: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn insert_church_rows(conn: &Connection, church: &NewChurch) -> AppResult<()> {
    conn.execute(
        "INSERT INTO churches (cid, english_name, address, built_century) VALUES (?1, ?2, ?3, ?4)",
        params![church.cid, church.english_name, church.address, church.built_century],
    )?;
    conn.execute(
        "INSERT INTO church_details (cid, architect, dedication, artists) VALUES (?1, ?2, ?3, ?4)",
        params![church.cid, church.architect, church.dedication, church.artists],
    )?;
    Ok(())
}

fn parse_church_record_row(row: &Row<'_>) -> rusqlite::Result<ChurchRecord> {
    Ok(ChurchRecord {
        cid: row.get(0)?,
        built_century: row.get(1)?,
    })
}
