use anyhow::Result;
use chrono::NaiveDate;
use gym_log_lib::{DbError, Store};
use std::fs;
use tempfile::TempDir;

// Helper function to create an in-memory store with the base schema
fn create_test_store() -> Result<Store> {
    let mut store = Store::open_in_memory()?;
    store.init_schema(None)?;
    Ok(store)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn test_insert_defaults_to_placeholder_and_today() -> Result<()> {
    let store = create_test_store()?;
    store.insert("Squats", None, None, None)?;
    store.insert("Squats", Some(100), Some(5), None)?;

    // Placeholders never show up in the history
    let history = store.query_history(50)?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].weight, 100);
    assert_eq!(history[0].reps, 5);
    assert_eq!(history[0].date, chrono::Local::now().date_naive());
    assert!(!history[0].is_placeholder());
    Ok(())
}

#[test]
fn test_insert_rejects_blank_exercise_name() -> Result<()> {
    let store = create_test_store()?;
    let result = store.insert("   ", Some(10), Some(10), None);
    assert!(matches!(result, Err(DbError::EmptyExerciseName)));
    assert!(store.list_distinct_exercises()?.is_empty());
    Ok(())
}

#[test]
fn test_distinct_exercises_keep_first_appearance_order() -> Result<()> {
    let store = create_test_store()?;
    store.insert("Rows", None, None, None)?;
    store.insert("Bench Press", None, None, None)?;
    store.insert("Rows", Some(60), Some(8), None)?;
    store.insert("Deadlifts", Some(140), Some(3), None)?;

    assert_eq!(
        store.list_distinct_exercises()?,
        vec!["Rows", "Bench Press", "Deadlifts"]
    );
    Ok(())
}

#[test]
fn test_delete_by_exercise_removes_every_row() -> Result<()> {
    let store = create_test_store()?;
    store.insert("Dips", None, None, None)?;
    store.insert("Dips", Some(20), Some(12), None)?;
    store.insert("Dips", Some(25), Some(10), None)?;
    store.insert("Pullups", Some(0), Some(8), None)?;

    assert_eq!(store.delete_by_exercise("Dips")?, 3);
    assert_eq!(store.delete_by_exercise("Dips")?, 0);
    assert_eq!(store.list_distinct_exercises()?, vec!["Pullups"]);
    Ok(())
}

#[test]
fn test_history_is_ascending_and_capped() -> Result<()> {
    let store = create_test_store()?;
    for i in 1..=60u32 {
        store.insert("Bicep Curls", Some(i), Some(10), Some(day(1)))?;
    }

    let history = store.query_history(50)?;
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].weight, 1);
    assert_eq!(history[49].weight, 50);
    assert!(history.windows(2).all(|w| w[0].id < w[1].id));
    Ok(())
}

#[test]
fn test_history_keeps_bodyweight_sets() -> Result<()> {
    let store = create_test_store()?;
    store.insert("Pullups", Some(0), Some(12), None)?;
    let history = store.query_history(50)?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reps, 12);
    Ok(())
}

#[test]
fn test_bests_pick_heaviest_set_per_exercise() -> Result<()> {
    let store = create_test_store()?;
    store.insert("Bench Press", Some(50), Some(10), Some(day(1)))?;
    store.insert("Bench Press", Some(80), Some(5), Some(day(2)))?;

    let bests = store.query_bests(50)?;
    assert_eq!(bests.len(), 1);
    assert_eq!(bests[0].exercise, "Bench Press");
    assert_eq!(bests[0].weight, 80);
    assert_eq!(bests[0].reps, 5);
    assert_eq!(bests[0].date, day(2));
    Ok(())
}

#[test]
fn test_bests_are_ordered_and_skip_placeholders() -> Result<()> {
    let store = create_test_store()?;
    store.insert("Rows", None, None, None)?;
    store.insert("Squats", Some(120), Some(5), Some(day(1)))?;
    store.insert("Deadlifts", Some(160), Some(3), Some(day(2)))?;
    store.insert("Overhead Press", Some(120), Some(2), Some(day(3)))?;

    let names: Vec<String> = store
        .query_bests(50)?
        .into_iter()
        .map(|b| b.exercise)
        .collect();
    assert_eq!(names, vec!["Deadlifts", "Squats", "Overhead Press"]);
    Ok(())
}

#[test]
fn test_bests_leave_out_exercises_with_only_placeholders() -> Result<()> {
    let store = create_test_store()?;
    for name in ["Bench Press", "Squats", "Rows"] {
        store.insert(name, None, None, None)?;
    }
    assert!(store.query_bests(50)?.is_empty());

    store.insert("Rows", Some(60), Some(8), None)?;
    let bests = store.query_bests(50)?;
    assert_eq!(bests.len(), 1);
    assert_eq!(bests[0].exercise, "Rows");
    Ok(())
}

#[test]
fn test_sets_recorded_on_filters_by_date() -> Result<()> {
    let store = create_test_store()?;
    store.insert("Squats", None, None, Some(day(5)))?;
    store.insert("Squats", Some(100), Some(5), Some(day(5)))?;
    store.insert("Squats", Some(105), Some(5), Some(day(6)))?;

    let sets = store.sets_recorded_on(day(5))?;
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].weight, 100);
    Ok(())
}

#[test]
fn test_file_store_survives_reopen() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("gym_routine.db");

    {
        let mut store = Store::open(&path)?;
        store.init_schema(None)?;
        for name in ["Bench Press", "Squats", "Rows"] {
            store.insert(name, None, None, None)?;
        }
    }

    let mut store = Store::open(&path)?;
    store.init_schema(None)?;
    assert_eq!(
        store.list_distinct_exercises()?,
        vec!["Bench Press", "Squats", "Rows"]
    );
    Ok(())
}

// --- Migrations ---

fn write_script(dir: &TempDir, name: &str, sql: &str) -> Result<()> {
    fs::write(dir.path().join(name), sql)?;
    Ok(())
}

#[test]
fn test_fresh_schema_starts_at_version_zero() -> Result<()> {
    let store = create_test_store()?;
    assert_eq!(store.schema_version()?, 0);
    Ok(())
}

#[test]
fn test_migrations_apply_once_in_filename_order() -> Result<()> {
    let dir = TempDir::new()?;
    // The second script depends on the first one
    write_script(&dir, "002_note_column.sql", "ALTER TABLE notes ADD COLUMN body TEXT;")?;
    write_script(&dir, "001_notes.sql", "CREATE TABLE notes (id INTEGER PRIMARY KEY);")?;
    write_script(&dir, "README.md", "not a migration")?;

    let mut store = Store::open_in_memory()?;
    assert_eq!(store.init_schema(Some(dir.path()))?, 2);
    assert_eq!(store.schema_version()?, 2);

    // Nothing left to do on the second run
    assert_eq!(store.init_schema(Some(dir.path()))?, 0);
    assert_eq!(store.schema_version()?, 2);

    write_script(&dir, "003_index.sql", "CREATE INDEX idx_notes_body ON notes (body);")?;
    assert_eq!(store.init_schema(Some(dir.path()))?, 1);
    assert_eq!(store.schema_version()?, 3);
    Ok(())
}

#[test]
fn test_broken_migration_keeps_last_good_version() -> Result<()> {
    let dir = TempDir::new()?;
    write_script(&dir, "001_ok.sql", "CREATE TABLE first (id INTEGER);")?;
    write_script(&dir, "002_broken.sql", "CREATE TABLE second (id INTEGER); NOT SQL AT ALL;")?;

    let mut store = Store::open_in_memory()?;
    let result = store.init_schema(Some(dir.path()));
    match result {
        Err(DbError::MigrationFailed { name, .. }) => assert_eq!(name, "002_broken.sql"),
        other => panic!("expected a failed migration, got {other:?}"),
    }
    assert_eq!(store.schema_version()?, 1);
    Ok(())
}

#[test]
fn test_missing_migration_dir_is_skipped() -> Result<()> {
    let dir = TempDir::new()?;
    let mut store = Store::open_in_memory()?;
    assert_eq!(store.init_schema(Some(&dir.path().join("absent")))?, 0);
    assert_eq!(store.schema_version()?, 0);
    Ok(())
}

#[test]
fn test_version_never_decreases_when_scripts_disappear() -> Result<()> {
    let dir = TempDir::new()?;
    write_script(&dir, "001_a.sql", "CREATE TABLE a (id INTEGER);")?;
    write_script(&dir, "002_b.sql", "CREATE TABLE b (id INTEGER);")?;

    let mut store = Store::open_in_memory()?;
    store.init_schema(Some(dir.path()))?;
    fs::remove_file(dir.path().join("002_b.sql"))?;

    assert_eq!(store.init_schema(Some(dir.path()))?, 0);
    assert_eq!(store.schema_version()?, 2);
    Ok(())
}

#[test]
fn test_shipped_migrations_apply_cleanly() -> Result<()> {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let mut store = Store::open_in_memory()?;
    let applied = store.init_schema(Some(&dir))?;
    assert!(applied > 0);
    assert_eq!(store.schema_version()?, applied);
    Ok(())
}
