use chrono::Utc;
use rusqlite::types::ValueRef;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::store::{SeriesDatabase, StoreError};

/// Write every user table as `DROP`/`CREATE`/`INSERT` statements.
/// Returns the number of rows written.
pub fn write_sql_dump<W: Write>(db: &SeriesDatabase, out: &mut W) -> Result<usize, StoreError> {
    let conn = db.connection();

    writeln!(out, "-- SQLite Database Export")?;
    writeln!(out, "-- Generated: {}", Utc::now().to_rfc3339())?;
    writeln!(out)?;

    let mut stmt = conn.prepare(
        "SELECT name, sql FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let tables = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows_written = 0;
    for (name, create_sql) in tables {
        writeln!(out, "-- Table: {}", name)?;
        writeln!(out, "DROP TABLE IF EXISTS {};", name)?;
        writeln!(out, "{};", create_sql.trim())?;
        for index_sql in table_indexes(db, &name)? {
            writeln!(out, "{};", index_sql.trim())?;
        }
        writeln!(out)?;

        let mut select = conn.prepare(&format!("SELECT * FROM {}", name))?;
        let column_count = select.column_count();
        let mut rows = select.query([])?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(sql_literal(row.get_ref(i)?));
            }
            writeln!(out, "INSERT INTO {} VALUES ({});", name, values.join(", "))?;
            rows_written += 1;
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(rows_written)
}

pub fn export_to_file(db: &SeriesDatabase, path: impl AsRef<Path>) -> Result<usize, StoreError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    let rows = write_sql_dump(db, &mut writer)?;
    info!("Database exported to {} ({} rows)", path.display(), rows);
    Ok(rows)
}

// Implicit primary-key indexes have no SQL and are skipped.
fn table_indexes(db: &SeriesDatabase, table: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = db.connection().prepare(
        "SELECT sql FROM sqlite_master
         WHERE type = 'index' AND tbl_name = ?1 AND sql IS NOT NULL
         ORDER BY name",
    )?;
    let indexes = stmt.query_map([table], |row| row.get(0))?;
    indexes.collect::<Result<Vec<_>, _>>().map_err(|e| e.into())
}

fn sql_literal(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => quote(&String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
            format!("X'{}'", hex)
        }
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
