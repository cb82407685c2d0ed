// src/db.rs
use chrono::{Local, NaiveDate};
use rusqlite::{named_params, params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Page size used by the history and bests screens.
pub const PAGE_SIZE: u32 = 50;

const DB_FILE_NAME: &str = "gym_routine.db";
const APP_DATA_DIR: &str = "gym-log";

/// One recorded row of the `gym_routine` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutEntry {
    pub id: i64,
    pub exercise: String,
    pub weight: u32, // kg, 0 for placeholder rows
    pub reps: u32,
    pub date: NaiveDate,
}

impl WorkoutEntry {
    /// Placeholder rows only register that an exercise exists.
    pub const fn is_placeholder(&self) -> bool {
        self.weight == 0 && self.reps == 0
    }
}

/// One row of the personal bests query. Exercises that only have
/// placeholder rows have no best and get no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalBest {
    pub exercise: String,
    pub weight: u32,
    pub reps: u32,
    pub date: NaiveDate,
}

// Custom Error type for store operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection failed: {0}")]
    Connection(#[source] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to create schema: {0}")]
    Schema(#[source] rusqlite::Error),
    #[error("Cannot read migration directory {path:?}: {source}")]
    MigrationDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot read migration file {path:?}: {source}")]
    MigrationRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Migration {name} failed: {source}")]
    MigrationFailed {
        name: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Database query failed: {0}")]
    QueryFailed(#[source] rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(#[source] rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(#[source] rusqlite::Error),
    #[error("Exercise name cannot be empty")]
    EmptyExerciseName,
    #[error("Store worker is no longer running")]
    WorkerGone,
}

/// Gets the default path of the SQLite file inside the app's data directory.
/// Creates the directory when missing.
pub fn get_db_path() -> Result<PathBuf, Error> {
    let data_dir = dirs::data_dir().ok_or(Error::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

/// Owns the single connection to the workout database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(Error::Connection)?;
        info!(path = %path.display(), "opened workout database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().map_err(Error::Connection)?;
        Ok(Self { conn })
    }

    /// Creates the tables if needed and applies outstanding migration scripts.
    /// Returns the number of scripts applied by this call.
    pub fn init_schema(&mut self, migrations_dir: Option<&Path>) -> Result<u32, Error> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS gym_routine (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    exercise TEXT NOT NULL,
                    weight INTEGER NOT NULL DEFAULT 0,
                    reps INTEGER NOT NULL DEFAULT 0,
                    date TEXT NOT NULL DEFAULT (date('now', 'localtime'))
                );
                CREATE TABLE IF NOT EXISTS schema_migrations (
                    version INTEGER NOT NULL
                );",
            )
            .map_err(Error::Schema)?;

        // A fresh database gets its single version row here
        if self.current_version()?.is_none() {
            self.conn
                .execute("INSERT INTO schema_migrations (version) VALUES (0)", [])
                .map_err(Error::Schema)?;
        }

        match migrations_dir {
            Some(dir) => self.migrate_up(dir),
            None => Ok(0),
        }
    }

    /// The number of migration scripts applied so far.
    pub fn schema_version(&self) -> Result<u32, Error> {
        Ok(self.current_version()?.unwrap_or(0))
    }

    fn current_version(&self) -> Result<Option<u32>, Error> {
        self.conn
            .query_row("SELECT version FROM schema_migrations LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Error::QueryFailed)
    }

    fn migrate_up(&mut self, dir: &Path) -> Result<u32, Error> {
        if !dir.is_dir() {
            info!(dir = %dir.display(), "no migration directory, skipping migrations");
            return Ok(0);
        }
        let scripts = migration_scripts(dir)?;
        let version = self.schema_version()?;
        let total = u32::try_from(scripts.len()).unwrap_or(u32::MAX);
        if version > total {
            warn!(version, total, "schema version is ahead of the migration scripts found");
            return Ok(0);
        }

        let mut applied = 0;
        for (index, path) in scripts.iter().enumerate().skip(version as usize) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let sql = fs::read_to_string(path).map_err(|source| Error::MigrationRead {
                path: path.clone(),
                source,
            })?;
            info!(migration = %name, "applying migration");

            // Script and version bump land together or not at all
            let failed = |source: rusqlite::Error| Error::MigrationFailed {
                name: name.clone(),
                source,
            };
            let tx = self.conn.transaction().map_err(failed)?;
            tx.execute_batch(&sql).map_err(failed)?;
            tx.execute(
                "UPDATE schema_migrations SET version = ?1",
                params![index as u32 + 1],
            )
            .map_err(failed)?;
            tx.commit().map_err(failed)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Appends one row. `None` weight/reps store 0, `None` date stores today.
    pub fn insert(
        &self,
        exercise: &str,
        weight: Option<u32>,
        reps: Option<u32>,
        date: Option<NaiveDate>,
    ) -> Result<i64, Error> {
        let exercise = exercise.trim();
        if exercise.is_empty() {
            return Err(Error::EmptyExerciseName);
        }
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        self.conn
            .execute(
                "INSERT INTO gym_routine (exercise, weight, reps, date)
                 VALUES (:exercise, :weight, :reps, :date)",
                named_params! {
                    ":exercise": exercise,
                    ":weight": weight.unwrap_or(0),
                    ":reps": reps.unwrap_or(0),
                    ":date": date,
                },
            )
            .map_err(Error::InsertFailed)?;
        let id = self.conn.last_insert_rowid();
        debug!(id, exercise, "inserted workout entry");
        Ok(id)
    }

    /// Deletes every row recorded for `name`. Not reversible.
    pub fn delete_by_exercise(&self, name: &str) -> Result<usize, Error> {
        let deleted = self
            .conn
            .execute("DELETE FROM gym_routine WHERE exercise = ?1", params![name])
            .map_err(Error::DeleteFailed)?;
        info!(exercise = name, deleted, "deleted exercise rows");
        Ok(deleted)
    }

    /// Distinct exercise names in order of first appearance.
    pub fn list_distinct_exercises(&self) -> Result<Vec<String>, Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT exercise FROM gym_routine GROUP BY exercise ORDER BY MIN(id)")
            .map_err(Error::QueryFailed)?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(Error::QueryFailed)?;
        names
            .collect::<Result<Vec<String>, _>>()
            .map_err(Error::QueryFailed)
    }

    /// Recorded sets (placeholders excluded), oldest first.
    pub fn query_history(&self, limit: u32) -> Result<Vec<WorkoutEntry>, Error> {
        self.query_entries(
            "SELECT id, exercise, weight, reps, date FROM gym_routine
             WHERE weight != 0 OR reps != 0
             ORDER BY id ASC LIMIT :limit",
            named_params! { ":limit": limit },
        )
    }

    /// Non-placeholder rows recorded on `date`, in insertion order.
    pub fn sets_recorded_on(&self, date: NaiveDate) -> Result<Vec<WorkoutEntry>, Error> {
        self.query_entries(
            "SELECT id, exercise, weight, reps, date FROM gym_routine
             WHERE date = :date AND (weight != 0 OR reps != 0)
             ORDER BY id ASC",
            named_params! { ":date": date },
        )
    }

    /// One row per exercise with recorded sets, holding its heaviest set.
    pub fn query_bests(&self, limit: u32) -> Result<Vec<PersonalBest>, Error> {
        // SQLite takes the bare columns from the row that produced MAX(weight)
        let mut stmt = self
            .conn
            .prepare(
                "SELECT exercise, MAX(weight) AS best, reps, date FROM gym_routine
                 WHERE weight != 0 OR reps != 0
                 GROUP BY exercise
                 ORDER BY best DESC, reps DESC
                 LIMIT ?1",
            )
            .map_err(Error::QueryFailed)?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(PersonalBest {
                    exercise: row.get(0)?,
                    weight: row.get(1)?,
                    reps: row.get(2)?,
                    date: row.get(3)?,
                })
            })
            .map_err(Error::QueryFailed)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(Error::QueryFailed)
    }

    fn query_entries(
        &self,
        sql: &str,
        params: &[(&str, &dyn rusqlite::ToSql)],
    ) -> Result<Vec<WorkoutEntry>, Error> {
        let mut stmt = self.conn.prepare(sql).map_err(Error::QueryFailed)?;
        let rows = stmt
            .query_map(params, map_row_to_entry)
            .map_err(Error::QueryFailed)?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(Error::QueryFailed)
    }
}

// Helper function to map a database row to a WorkoutEntry struct
fn map_row_to_entry(row: &Row) -> Result<WorkoutEntry, rusqlite::Error> {
    Ok(WorkoutEntry {
        id: row.get(0)?,
        exercise: row.get(1)?,
        weight: row.get(2)?,
        reps: row.get(3)?,
        date: row.get(4)?,
    })
}

/// `*.sql` files of `dir`, sorted by file name.
fn migration_scripts(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(dir).map_err(|source| Error::MigrationDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut scripts = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| Error::MigrationDir {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            scripts.push(path);
        }
    }
    scripts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(scripts)
}
