//! The `docSet.dsidx` SQLite search index read by Dash.

use std::{fs, path::Path};

use rusqlite::{Connection, params};
use tempfile::Builder as TempBuilder;
use tracing::info;

use crate::{
    error::{IoContext, Result},
    fileutils::persist,
    index::{EntryKind, IndexRow, SearchIndex},
};

/// File name of the index inside `Contents/Resources`.
pub const DSIDX_FILE: &str = "docSet.dsidx";

/// Table and uniqueness constraint expected by Dash.
const SCHEMA: &str = "
    CREATE TABLE searchIndex(id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, type TEXT, path TEXT);
    CREATE UNIQUE INDEX anchor ON searchIndex (name, type, path);
";

/// Write `index` to `path`.
///
/// The database is built in a temporary file beside `path` and renamed over it
/// once every row has been committed.
pub fn write_dsidx(path: &Path, index: &SearchIndex) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).at(dir)?;
    let tmp = TempBuilder::new()
        .prefix(".docSet")
        .suffix(".dsidx")
        .tempfile_in(dir)
        .at(dir)?;

    {
        let mut conn = Connection::open(tmp.path())?;
        conn.execute_batch(SCHEMA)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO searchIndex(name, type, path) VALUES (?1, ?2, ?3)")?;
            for row in index.rows() {
                stmt.execute(params![row.name, row.kind.label(), row.path])?;
            }
        }
        tx.commit()?;
        conn.close().map_err(|(_, e)| e)?;
    }

    persist(tmp, path)?;
    info!(path = %path.display(), rows = index.len(), "search index written");
    Ok(())
}

/// Read every row back from an index file.
pub fn read_dsidx(path: &Path) -> Result<Vec<IndexRow>> {
    let conn = Connection::open(path)?;
    let mut stmt = conn.prepare("SELECT name, type, path FROM searchIndex ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            let kind: String = row.get(1)?;
            let kind = kind.parse::<EntryKind>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
            })?;
            Ok(IndexRow::new(row.get::<_, String>(0)?, kind, row.get::<_, String>(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn writes_and_reads_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Contents/Resources").join(DSIDX_FILE);
        let index = SearchIndex::from_rows(vec![
            IndexRow::new("Overview", EntryKind::Guide, "guide/overview.html"),
            IndexRow::new("Observable", EntryKind::Class, "api/index/class/Observable.html"),
        ])
        .unwrap();
        write_dsidx(&path, &index).unwrap();
        assert_eq!(read_dsidx(&path).unwrap(), index.rows().to_vec());
    }

    #[test]
    fn unique_constraint_is_enforced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DSIDX_FILE);
        write_dsidx(&path, &SearchIndex::default()).unwrap();
        let conn = Connection::open(&path).unwrap();
        let insert = "INSERT INTO searchIndex(name, type, path) VALUES ('map', 'Function', 'api/map.html')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }

    #[test]
    fn rewrite_replaces_previous_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DSIDX_FILE);
        let first = SearchIndex::from_rows(vec![IndexRow::new("a", EntryKind::Guide, "a.html")]).unwrap();
        let second = SearchIndex::from_rows(vec![IndexRow::new("b", EntryKind::Enum, "b.html")]).unwrap();
        write_dsidx(&path, &first).unwrap();
        write_dsidx(&path, &second).unwrap();
        assert_eq!(read_dsidx(&path).unwrap(), second.rows().to_vec());
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn index_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DSIDX_FILE);
        write_dsidx(&path, &SearchIndex::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
