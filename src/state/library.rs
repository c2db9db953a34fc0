use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;
use rusqlite::{params, params_from_iter, Connection};

use super::data::{NewImage, ToothRow, MATCH_COLUMNS, SWEEP_PARAMS};
use crate::error::{SeekerError, SeekerResult};

/// The Library manages one ToothSeeker catalog database.
///
/// It owns the SQLite connection, the fixed `images` schema, the neighbor
/// queries the stack viewer is built on, and the duplicate-removal pass
/// with its CSV audit trail.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
    table: String,
}

/// Outcome of a duplicate-removal pass.
#[derive(Debug, Clone)]
pub struct DuplicateReport {
    /// Number of equivalence classes that had more than one row
    pub groups: usize,
    /// Number of rows deleted
    pub removed: usize,
    /// The audit CSV, written next to the database (header-only when clean)
    pub audit_csv: PathBuf,
}

/// One row of the duplicate window query: a row that shares every identity
/// column with the group's minimum-id row but is not that row.
#[derive(Debug, Clone)]
struct DuplicateRow {
    min_id: i64,
    id: i64,
    path: String,
    min_path: String,
}

fn table_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

fn validate_table(table: &str) -> SeekerResult<String> {
    if table_name_regex().is_match(table) {
        Ok(table.to_string())
    } else {
        Err(SeekerError::BadTableName(table.to_string()))
    }
}

/// Identity columns joined for SELECT lists and PARTITION BY clauses,
/// double-quoted because `Set` is an SQL keyword.
fn quoted_match_columns() -> String {
    MATCH_COLUMNS
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Library {
    /// Create a brand new database file and its images table.
    /// Refuses to touch a path that already exists.
    pub fn create(db_path: &Path, table: &str) -> SeekerResult<Self> {
        let table = validate_table(table)?;
        if db_path.exists() {
            return Err(SeekerError::DatabaseExists(db_path.to_path_buf()));
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
            table,
        };
        library.init_schema()?;

        println!("📁 Database created at: {}", db_path.display());
        Ok(library)
    }

    /// Open an existing database. Missing files are an error so the shell
    /// can prompt for a valid one instead of silently creating an empty db.
    pub fn open(db_path: &Path, table: &str) -> SeekerResult<Self> {
        let table = validate_table(table)?;
        if !db_path.is_file() {
            return Err(SeekerError::DatabaseMissing(db_path.to_path_buf()));
        }
        let conn = Connection::open(db_path)?;
        Ok(Library {
            conn,
            db_path: db_path.to_path_buf(),
            table,
        })
    }

    /// Open an in-memory catalog (for testing the query layer).
    pub fn open_in_memory(table: &str) -> SeekerResult<Self> {
        let table = validate_table(table)?;
        let conn = Connection::open_in_memory()?;
        let library = Library {
            conn,
            db_path: PathBuf::from(":memory:"),
            table,
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Create the images table. One row per screenshot; `path` is unique,
    /// `id` is the auto-assigned rowid.
    fn init_schema(&self) -> SeekerResult<()> {
        self.conn.execute(
            &format!(
                "CREATE TABLE \"{table}\" (
                    id INTEGER PRIMARY KEY,
                    path TEXT UNIQUE,
                    model TEXT,
                    viewthresh REAL,
                    viewmode INTEGER,
                    iter INTEGER,
                    \"Egr\" REAL,
                    \"Mgr\" REAL,
                    \"Rep\" REAL,
                    \"Swi\" REAL,
                    \"Adh\" REAL,
                    \"Act\" REAL,
                    \"Inh\" REAL,
                    \"Sec\" REAL,
                    \"Da\" REAL,
                    \"Di\" REAL,
                    \"Ds\" REAL,
                    \"Int\" REAL,
                    \"Set\" REAL,
                    \"Boy\" REAL,
                    \"Dff\" REAL,
                    \"Bgr\" REAL,
                    \"Abi\" REAL,
                    \"Pbi\" REAL,
                    \"Lbi\" REAL,
                    \"Bbi\" REAL,
                    \"Rad\" REAL,
                    \"Deg\" REAL,
                    \"Dgr\" REAL,
                    \"Ntr\" REAL,
                    \"Bwi\" REAL,
                    \"Ina\" REAL,
                    \"uMgr\" REAL,
                    faulty BOOL
                )",
                table = self.table
            ),
            [],
        )?;
        Ok(())
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Name of the images table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of catalogued screenshots
    pub fn image_count(&self) -> SeekerResult<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert one scanned screenshot. Returns the new row id.
    pub fn insert_image(&self, image: &NewImage) -> SeekerResult<i64> {
        let mut values = vec![rusqlite::types::Value::Text(image.path.clone())];
        values.extend(image.params.sql_values(false));

        let placeholders = (1..=values.len())
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn.execute(
            &format!(
                "INSERT INTO \"{table}\" (path, {columns}) VALUES ({placeholders})",
                table = self.table,
                columns = quoted_match_columns(),
            ),
            params_from_iter(values),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch a row by id.
    pub fn row(&self, id: i64) -> SeekerResult<ToothRow> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, path, {columns} FROM \"{table}\" WHERE id = ?1",
            columns = quoted_match_columns(),
            table = self.table,
        ))?;
        let mut rows = stmt.query_map(params![id], ToothRow::from_sql_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(SeekerError::RowNotFound(id)),
        }
    }

    /// Row id of the screenshot stored under exactly `path`, if any.
    pub fn row_id_for_path(&self, path: &str) -> SeekerResult<Option<i64>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id FROM \"{}\" WHERE path = ?1",
            self.table
        ))?;
        let mut rows = stmt.query_map(params![path], |row| row.get::<_, i64>(0))?;
        match rows.next() {
            Some(id) => Ok(Some(id?)),
            None => Ok(None),
        }
    }

    /// Resolve a file dropped onto the window to a row id.
    ///
    /// Tries the dropped path verbatim first, then the same path expressed
    /// relative to the database's own directory (databases usually live next
    /// to the export folder they were built from).
    pub fn row_id_for_dropped_path(&self, dropped: &Path) -> SeekerResult<Option<i64>> {
        if let Some(id) = self.row_id_for_path(&dropped.to_string_lossy())? {
            return Ok(Some(id));
        }
        if let Some(parent) = self.db_path.parent() {
            if let Ok(relative) = dropped.strip_prefix(parent) {
                return self.row_id_for_path(&relative.to_string_lossy());
            }
        }
        Ok(None)
    }

    /// First stored path, shown to the user as an example of the expected
    /// path form when a drop lookup fails.
    pub fn first_path(&self) -> SeekerResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT path FROM \"{}\" LIMIT 1", self.table))?;
        let mut rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(path) => Ok(Some(path?)),
            None => Ok(None),
        }
    }

    /// A random existing row id (`None` on an empty table).
    pub fn random_row_id(&self) -> SeekerResult<Option<i64>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id FROM \"{}\" ORDER BY RANDOM() LIMIT 1",
            self.table
        ))?;
        let mut rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        match rows.next() {
            Some(id) => Ok(Some(id?)),
            None => Ok(None),
        }
    }

    /// Rows that differ from `base` in the chosen axis parameter and
    /// nowhere else (`id` and `path` excluded from the comparison).
    pub fn neighbors(&self, base: &ToothRow, axis: &str) -> SeekerResult<Vec<ToothRow>> {
        let (sql, bindings) = self.neighbor_query(base, axis, false)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bindings), ToothRow::from_sql_row)?;
        let mut neighbors = Vec::new();
        for row in rows {
            neighbors.push(row?);
        }
        Ok(neighbors)
    }

    /// Number of neighbors of `base` along `axis`.
    pub fn neighbor_count(&self, base: &ToothRow, axis: &str) -> SeekerResult<usize> {
        let (sql, bindings) = self.neighbor_query(base, axis, true)?;
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bindings), |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Neighbor counts of `base` along every sweep parameter, in
    /// [`SWEEP_PARAMS`] order. Feeds the axis picker and the side column.
    pub fn neighbor_counts(&self, base: &ToothRow) -> SeekerResult<Vec<(&'static str, usize)>> {
        let mut counts = Vec::with_capacity(SWEEP_PARAMS.len());
        for name in SWEEP_PARAMS {
            counts.push((name, self.neighbor_count(base, name)?));
        }
        Ok(counts)
    }

    /// Build the neighbor query: axis column must differ, every other
    /// identity column must match the base row exactly.
    fn neighbor_query(
        &self,
        base: &ToothRow,
        axis: &str,
        count_only: bool,
    ) -> SeekerResult<(String, Vec<rusqlite::types::Value>)> {
        if !SWEEP_PARAMS.contains(&axis) {
            return Err(SeekerError::UnknownParameter(axis.to_string()));
        }

        let match_values = base.match_values();
        let axis_index = MATCH_COLUMNS
            .iter()
            .position(|name| *name == axis)
            .ok_or_else(|| SeekerError::UnknownParameter(axis.to_string()))?;

        let mut bindings = vec![
            rusqlite::types::Value::Integer(base.id),
            match_values[axis_index].clone(),
        ];
        let mut conditions = Vec::with_capacity(MATCH_COLUMNS.len() - 1);
        for (index, name) in MATCH_COLUMNS.iter().enumerate() {
            if index == axis_index {
                continue;
            }
            bindings.push(match_values[index].clone());
            conditions.push(format!("\"{name}\" = ?{}", bindings.len()));
        }

        let select = if count_only {
            "COUNT(*)".to_string()
        } else {
            format!("id, path, {}", quoted_match_columns())
        };
        let sql = format!(
            "SELECT {select} FROM \"{table}\" WHERE id != ?1 AND \"{axis}\" != ?2 AND {matches}",
            table = self.table,
            matches = conditions.join(" AND "),
        );
        Ok((sql, bindings))
    }

    /// Remove rows that are identical to an earlier row in every column
    /// except `id` and `path`, keeping the minimum-id row of each group.
    ///
    /// Every removal is logged to a timestamped audit CSV next to the
    /// database, together with the row it was preserved by. The audit file
    /// is written even when nothing was removed.
    pub fn remove_duplicates(&self) -> SeekerResult<DuplicateReport> {
        let columns = quoted_match_columns();
        let sql = format!(
            "SELECT min_id, id, path, min_path
             FROM (
                 SELECT
                     MIN(id) OVER w AS min_id,
                     MIN(path) OVER w AS min_path,
                     id,
                     path
                 FROM \"{table}\"
                 WINDOW w AS (PARTITION BY {columns})
             )
             WHERE id != min_id
             ORDER BY min_id, id",
            table = self.table,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(DuplicateRow {
                min_id: row.get(0)?,
                id: row.get(1)?,
                path: row.get(2)?,
                min_path: row.get(3)?,
            })
        })?;
        let mut duplicates = Vec::new();
        for row in rows {
            duplicates.push(row?);
        }

        let audit_csv = self.write_duplicate_audit(&duplicates)?;

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut delete = tx.prepare(&format!(
                "DELETE FROM \"{}\" WHERE id = ?1",
                self.table
            ))?;
            for duplicate in &duplicates {
                delete.execute(params![duplicate.id])?;
            }
        }
        tx.commit()?;

        let groups = duplicates
            .iter()
            .map(|duplicate| duplicate.min_id)
            .collect::<std::collections::HashSet<_>>()
            .len();
        Ok(DuplicateReport {
            groups,
            removed: duplicates.len(),
            audit_csv,
        })
    }

    /// Write the duplicate audit trail: per group one `preserved` line for
    /// the kept row, then one `removed` line per deleted row.
    fn write_duplicate_audit(&self, duplicates: &[DuplicateRow]) -> SeekerResult<PathBuf> {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_name = format!(
            "{}___removed_duplicates___{timestamp}.csv",
            self.db_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.table.clone()),
        );
        let audit_path = match self.db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(&file_name),
            _ => PathBuf::from(&file_name),
        };

        let mut writer = csv::Writer::from_path(&audit_path)?;
        writer.write_record(["min_id", "id", "path", "status"])?;
        let mut previous_group: Option<i64> = None;
        for duplicate in duplicates {
            if previous_group != Some(duplicate.min_id) {
                writer.write_record([
                    duplicate.min_id.to_string(),
                    duplicate.min_id.to_string(),
                    duplicate.min_path.clone(),
                    "preserved".to_string(),
                ])?;
                previous_group = Some(duplicate.min_id);
            }
            writer.write_record([
                duplicate.min_id.to_string(),
                duplicate.id.to_string(),
                duplicate.path.clone(),
                "removed".to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(audit_path)
    }

    /// Dump the whole table to `<db path>.csv` (space-separated, with a
    /// header row). Returns the path written.
    pub fn export_table_csv(&self) -> SeekerResult<PathBuf> {
        let csv_path = self.db_path.with_extension("csv");
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b' ')
            .from_path(&csv_path)?;

        let mut header = vec!["id", "path"];
        header.extend(MATCH_COLUMNS);
        writer.write_record(&header)?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, path, {columns} FROM \"{table}\" ORDER BY id",
            columns = quoted_match_columns(),
            table = self.table,
        ))?;
        let rows = stmt.query_map([], ToothRow::from_sql_row)?;
        for row in rows {
            let row = row?;
            let mut record = vec![row.id.to_string(), row.path.clone()];
            for value in row.match_values() {
                record.push(match value {
                    rusqlite::types::Value::Text(text) => text,
                    rusqlite::types::Value::Integer(n) => n.to_string(),
                    rusqlite::types::Value::Real(x) => x.to_string(),
                    other => format!("{other:?}"),
                });
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;

        println!(
            "📄 Table '{}' exported to '{}'",
            self.table,
            csv_path.display()
        );
        Ok(csv_path)
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .field("table", &self.table)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::test_support::sample_params;
    use crate::state::data::ParamSet;

    fn insert(library: &Library, path: &str, tweak: impl FnOnce(&mut ParamSet)) -> i64 {
        let mut params = sample_params();
        tweak(&mut params);
        library
            .insert_image(&NewImage {
                path: path.to_string(),
                params,
            })
            .unwrap()
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("teeth.db");
        std::fs::write(&db_path, b"").unwrap();

        let result = Library::create(&db_path, "images");
        assert!(matches!(result, Err(SeekerError::DatabaseExists(_))));
    }

    #[test]
    fn test_open_refuses_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Library::open(&dir.path().join("nope.db"), "images");
        assert!(matches!(result, Err(SeekerError::DatabaseMissing(_))));
    }

    #[test]
    fn test_table_name_is_validated() {
        let result = Library::open_in_memory("images; DROP TABLE students");
        assert!(matches!(result, Err(SeekerError::BadTableName(_))));
    }

    #[test]
    fn test_insert_and_lookup_round_trip() {
        let library = Library::open_in_memory("images").unwrap();
        let id = insert(&library, "exports/run_1/screenshots/ToothMaker_00_0000009000.png", |_| {});

        assert_eq!(library.image_count().unwrap(), 1);
        let row = library.row(id).unwrap();
        assert_eq!(row.params, sample_params());
        assert!(!row.faulty);
        assert_eq!(
            library
                .row_id_for_path("exports/run_1/screenshots/ToothMaker_00_0000009000.png")
                .unwrap(),
            Some(id)
        );
        assert_eq!(library.row_id_for_path("elsewhere.png").unwrap(), None);
        assert!(library.first_path().unwrap().is_some());
        assert_eq!(library.random_row_id().unwrap(), Some(id));
    }

    #[test]
    fn test_duplicate_paths_are_rejected() {
        let library = Library::open_in_memory("images").unwrap();
        insert(&library, "a.png", |_| {});

        let result = library.insert_image(&NewImage {
            path: "a.png".to_string(),
            params: sample_params(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_neighbor_differs_in_exactly_one_parameter() {
        let library = Library::open_in_memory("images").unwrap();
        let base_id = insert(&library, "base.png", |_| {});
        insert(&library, "inh_up.png", |p| p.inh = 50.0);
        insert(&library, "inh_down.png", |p| p.inh = 10.0);
        insert(&library, "two_changes.png", |p| {
            p.inh = 50.0;
            p.egr = 0.03;
        });
        insert(&library, "egr_only.png", |p| p.egr = 0.03);

        let base = library.row(base_id).unwrap();
        let neighbors = library.neighbors(&base, "Inh").unwrap();
        let paths: Vec<&str> = neighbors.iter().map(|row| row.path.as_str()).collect();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&"inh_up.png"));
        assert!(paths.contains(&"inh_down.png"));
    }

    #[test]
    fn test_identical_row_is_not_a_neighbor() {
        // Same parameters everywhere: the axis value does not differ, so the
        // row is a duplicate, not a neighbor.
        let library = Library::open_in_memory("images").unwrap();
        let base_id = insert(&library, "base.png", |_| {});
        insert(&library, "copy.png", |_| {});

        let base = library.row(base_id).unwrap();
        assert!(library.neighbors(&base, "Inh").unwrap().is_empty());
    }

    #[test]
    fn test_integer_axis_neighbors() {
        let library = Library::open_in_memory("images").unwrap();
        let base_id = insert(&library, "base.png", |_| {});
        insert(&library, "longer.png", |p| p.iter = 14000);

        let base = library.row(base_id).unwrap();
        let neighbors = library.neighbors(&base, "iter").unwrap();
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].params.iter, 14000);
    }

    #[test]
    fn test_axis_must_be_a_sweep_parameter() {
        let library = Library::open_in_memory("images").unwrap();
        let base_id = insert(&library, "base.png", |_| {});
        let base = library.row(base_id).unwrap();

        assert!(matches!(
            library.neighbors(&base, "model"),
            Err(SeekerError::UnknownParameter(_))
        ));
        assert!(matches!(
            library.neighbors(&base, "path"),
            Err(SeekerError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_neighbor_counts_cover_all_sweep_params() {
        let library = Library::open_in_memory("images").unwrap();
        let base_id = insert(&library, "base.png", |_| {});
        insert(&library, "inh_up.png", |p| p.inh = 50.0);
        insert(&library, "inh_down.png", |p| p.inh = 10.0);
        insert(&library, "egr_up.png", |p| p.egr = 0.03);

        let base = library.row(base_id).unwrap();
        let counts = library.neighbor_counts(&base).unwrap();
        assert_eq!(counts.len(), SWEEP_PARAMS.len());

        let count_of = |name: &str| {
            counts
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, count)| *count)
                .unwrap()
        };
        assert_eq!(count_of("Inh"), 2);
        assert_eq!(count_of("Egr"), 1);
        assert_eq!(count_of("Bwi"), 0);
    }

    #[test]
    fn test_remove_duplicates_keeps_minimum_id() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::create(&dir.path().join("teeth.db"), "images").unwrap();

        let keep = insert(&library, "first.png", |_| {});
        insert(&library, "second.png", |_| {});
        insert(&library, "third.png", |_| {});
        let other = insert(&library, "other.png", |p| p.inh = 50.0);

        let report = library.remove_duplicates().unwrap();
        assert_eq!(report.groups, 1);
        assert_eq!(report.removed, 2);
        assert_eq!(library.image_count().unwrap(), 2);
        assert!(library.row(keep).is_ok());
        assert!(library.row(other).is_ok());

        let audit = std::fs::read_to_string(&report.audit_csv).unwrap();
        let lines: Vec<&str> = audit.lines().collect();
        assert_eq!(lines[0], "min_id,id,path,status");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("preserved"));
        assert!(lines[1].contains("first.png"));
        assert!(lines[2].contains("removed"));
        assert!(lines[3].contains("removed"));
    }

    #[test]
    fn test_remove_duplicates_writes_header_only_when_clean() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::create(&dir.path().join("teeth.db"), "images").unwrap();
        insert(&library, "a.png", |_| {});
        insert(&library, "b.png", |p| p.inh = 50.0);

        let report = library.remove_duplicates().unwrap();
        assert_eq!(report.removed, 0);
        assert_eq!(report.groups, 0);
        assert_eq!(library.image_count().unwrap(), 2);

        let audit = std::fs::read_to_string(&report.audit_csv).unwrap();
        assert_eq!(audit.trim(), "min_id,id,path,status");
    }

    #[test]
    fn test_rows_differing_only_in_faulty_are_not_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::create(&dir.path().join("teeth.db"), "images").unwrap();
        insert(&library, "a.png", |_| {});
        let flagged = insert(&library, "b.png", |_| {});
        library
            .conn
            .execute("UPDATE images SET faulty = 1 WHERE id = ?1", params![flagged])
            .unwrap();

        let report = library.remove_duplicates().unwrap();
        assert_eq!(report.removed, 0);
    }

    #[test]
    fn test_export_table_csv_is_space_separated() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::create(&dir.path().join("teeth.db"), "images").unwrap();
        insert(&library, "a.png", |_| {});
        insert(&library, "b.png", |p| p.inh = 50.0);

        let csv_path = library.export_table_csv().unwrap();
        assert_eq!(csv_path, dir.path().join("teeth.csv"));

        let text = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id path model viewthresh"));
        assert!(lines[1].starts_with("1 a.png"));
    }
}
