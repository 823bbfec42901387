use std::path::Path;

use crate::error::Error;

/// Column metadata with the positional ODBC catalog fields already resolved
/// into named fields at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
}

/// An ordered result set. Cells are the driver's text rendering of each
/// value; `None` is SQL NULL.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// One open database connection, scoped to a single handler invocation.
/// Dropping it releases the underlying driver resources.
pub trait Connection {
    /// Names of user tables of type `TABLE`, as reported by the driver.
    /// System-catalog filtering is the caller's concern.
    fn tables(&mut self) -> Result<Vec<String>, Error>;

    /// Column metadata for the named table. Empty when the table is unknown
    /// or has no columns; the driver does not distinguish the two.
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, Error>;

    /// Execute a statement. `None` means the driver produced no result-set
    /// descriptor for it.
    fn query(&mut self, sql: &str) -> Result<Option<ResultSet>, Error>;
}

/// Factory for scoped connections plus driver-manager introspection.
pub trait Driver {
    fn connect<'a>(&'a self, path: &Path) -> Result<Box<dyn Connection + 'a>, Error>;

    /// Names of all drivers visible to the process.
    fn driver_names(&self) -> Result<Vec<String>, Error>;
}
