use std::path::Path;

use odbc_api::{Cursor, Environment, ResultSetMetadata};

use crate::driver::{ColumnInfo, Connection, Driver, ResultSet};
use crate::error::Error;

// Positions of the fields we read from the ODBC catalog result sets
// (SQLTables / SQLColumns), 1-based per the ODBC spec.
const TABLES_NAME_FIELD: u16 = 3;
const COLUMNS_NAME_FIELD: u16 = 4;
const COLUMNS_TYPE_FIELD: u16 = 6;
const COLUMNS_NULLABLE_FIELD: u16 = 11;

/// Build an Access driver connection string for the given file path.
pub fn connection_string(path: &Path) -> String {
    format!(
        "DRIVER={{Microsoft Access Driver (*.mdb, *.accdb)}};DBQ={};ExtendedAnsiSQL=1;",
        path.display()
    )
}

/// ODBC-backed driver. Holds the process-wide ODBC environment; connections
/// are opened per call and dropped when the handler finishes.
pub struct OdbcDriver {
    env: Environment,
}

impl OdbcDriver {
    pub fn new() -> Result<Self, Error> {
        let env = Environment::new().map_err(driver_err)?;
        Ok(Self { env })
    }
}

impl Driver for OdbcDriver {
    fn connect<'a>(&'a self, path: &Path) -> Result<Box<dyn Connection + 'a>, Error> {
        let conn = self
            .env
            .connect_with_connection_string(&connection_string(path))
            .map_err(driver_err)?;
        Ok(Box::new(ScopedConnection { conn }))
    }

    fn driver_names(&self) -> Result<Vec<String>, Error> {
        let drivers = self.env.drivers().map_err(driver_err)?;
        Ok(drivers.into_iter().map(|d| d.description).collect())
    }
}

struct ScopedConnection<'env> {
    conn: odbc_api::Connection<'env>,
}

impl Connection for ScopedConnection<'_> {
    fn tables(&mut self) -> Result<Vec<String>, Error> {
        let mut cursor = self
            .conn
            .tables("", "", "", "TABLE")
            .map_err(driver_err)?;

        let mut names = Vec::new();
        let mut buf = Vec::new();
        while let Some(mut row) = cursor.next_row().map_err(driver_err)? {
            if let Some(name) = get_text_cell(&mut row, TABLES_NAME_FIELD, &mut buf)? {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, Error> {
        let mut cursor = self
            .conn
            .columns("", "", table, "")
            .map_err(driver_err)?;

        let mut columns = Vec::new();
        let mut buf = Vec::new();
        while let Some(mut row) = cursor.next_row().map_err(driver_err)? {
            let name = get_text_cell(&mut row, COLUMNS_NAME_FIELD, &mut buf)?.unwrap_or_default();
            let type_name =
                get_text_cell(&mut row, COLUMNS_TYPE_FIELD, &mut buf)?.unwrap_or_default();
            // SQL_NO_NULLS is 0; both SQL_NULLABLE and SQL_NULLABLE_UNKNOWN
            // report as nullable.
            let nullable = get_text_cell(&mut row, COLUMNS_NULLABLE_FIELD, &mut buf)?
                .map(|v| v != "0")
                .unwrap_or(false);
            columns.push(ColumnInfo {
                name,
                type_name,
                nullable,
            });
        }
        Ok(columns)
    }

    fn query(&mut self, sql: &str) -> Result<Option<ResultSet>, Error> {
        let cursor = self.conn.execute(sql, ()).map_err(driver_err)?;
        let Some(mut cursor) = cursor else {
            return Ok(None);
        };

        let n_cols = cursor.num_result_cols().map_err(driver_err)? as u16;
        let mut columns = Vec::with_capacity(n_cols as usize);
        for col in 1..=n_cols {
            columns.push(cursor.col_name(col).map_err(driver_err)?);
        }

        let mut rows = Vec::new();
        let mut buf = Vec::new();
        while let Some(mut row) = cursor.next_row().map_err(driver_err)? {
            let mut values = Vec::with_capacity(n_cols as usize);
            for col in 1..=n_cols {
                values.push(get_text_cell(&mut row, col, &mut buf)?);
            }
            rows.push(values);
        }

        Ok(Some(ResultSet { columns, rows }))
    }
}

/// Read one cell as text, `None` for SQL NULL.
fn get_text_cell(
    row: &mut odbc_api::CursorRow<'_>,
    col: u16,
    buf: &mut Vec<u8>,
) -> Result<Option<String>, Error> {
    buf.clear();
    let is_present = row.get_text(col, buf).map_err(driver_err)?;
    if is_present {
        Ok(Some(String::from_utf8_lossy(buf).into_owned()))
    } else {
        Ok(None)
    }
}

fn driver_err(e: odbc_api::Error) -> Error {
    Error::Driver(e.to_string())
}
