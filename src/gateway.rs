use crate::driver::{Connection, Driver};
use crate::error::Error;
use crate::format;
use crate::registry::{Registry, DEFAULT_NAME};

/// Reserved prefix of Access system catalog tables, excluded from listings.
const SYSTEM_TABLE_PREFIX: &str = "MSys";

/// The four database operations plus connection diagnostics, layered over an
/// injected registry and driver. Every handler is one stateless round trip:
/// resolve database, open a scoped connection, perform one driver call,
/// format.
pub struct Gateway<D> {
    registry: Registry,
    driver: D,
}

impl<D: Driver> Gateway<D> {
    pub fn new(registry: Registry, driver: D) -> Self {
        Self { registry, driver }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Report every registry entry with its path and an existence marker.
    pub fn list_databases(&self) -> String {
        tracing::info!("Listing available databases");
        format::databases(self.registry.iter())
    }

    /// List user tables, excluding the `MSys` system catalog.
    pub fn list_tables(&self, database: Option<&str>) -> Result<String, Error> {
        let name = database.unwrap_or(DEFAULT_NAME);
        tracing::info!("Listing tables in database: {}", name);

        let mut conn = self.open(database).map_err(|e| {
            with_context(e, &format!("Error connecting to database '{name}'"))
        })?;
        let mut tables = conn
            .tables()
            .map_err(|e| with_context(e, &format!("Error connecting to database '{name}'")))?;
        tables.retain(|t| !t.starts_with(SYSTEM_TABLE_PREFIX));

        Ok(format::table_names(name, &tables))
    }

    /// Execute a read-only SELECT statement and render its result set.
    ///
    /// The authorization control is a prefix check on the trimmed, uppercased
    /// input; anything else is rejected before the driver is contacted.
    pub fn query(&self, sql: &str, database: Option<&str>) -> Result<String, Error> {
        let name = database.unwrap_or(DEFAULT_NAME);
        tracing::info!("Executing query in database '{}': {}", name, sql);

        let path = self.registry.resolve(database)?;
        if !path.exists() {
            return Err(Error::Unavailable(path.to_path_buf()));
        }
        if !sql.trim().to_uppercase().starts_with("SELECT") {
            return Err(Error::RejectedQuery);
        }

        let mut conn = self
            .driver
            .connect(path)
            .map_err(|e| with_context(e, "Error executing query"))?;
        let result = conn
            .query(sql)
            .map_err(|e| with_context(e, "Error executing query"))?;

        Ok(match result {
            None => "Query executed successfully, but returned no results.".to_string(),
            Some(result) => format::result_set(name, &result),
        })
    }

    /// Report name, declared type and nullability for each column of a table.
    pub fn describe_table(&self, table: &str, database: Option<&str>) -> Result<String, Error> {
        let name = database.unwrap_or(DEFAULT_NAME);
        tracing::info!("Describing table '{}' in database '{}'", table, name);

        let mut conn = self
            .open(database)
            .map_err(|e| with_context(e, "Error describing table"))?;
        let columns = conn
            .columns(table)
            .map_err(|e| with_context(e, "Error describing table"))?;

        Ok(format::columns(table, name, &columns))
    }

    /// Report the configured path, its existence, and the ODBC drivers
    /// visible to the process.
    pub fn connection_info(&self, database: Option<&str>) -> Result<String, Error> {
        let name = database.unwrap_or(DEFAULT_NAME);
        tracing::info!("Getting connection info for database '{}'", name);

        let path = self.registry.resolve(database)?;
        let drivers = self.driver.driver_names().unwrap_or_else(|e| {
            tracing::error!("Error getting ODBC drivers: {}", e);
            Vec::new()
        });

        Ok(format::connection_info(name, path, &drivers))
    }

    /// Resolve the database and open a scoped connection, verifying the file
    /// exists first. The connection is released when the returned handle is
    /// dropped, on every exit path of the calling handler.
    fn open(&self, database: Option<&str>) -> Result<Box<dyn Connection + '_>, Error> {
        let path = self.registry.resolve(database)?;
        if !path.exists() {
            return Err(Error::Unavailable(path.to_path_buf()));
        }
        self.driver.connect(path)
    }
}

/// Prefix driver failures with the handler's context, as the responses
/// historically read. Other error kinds already carry their full message.
fn with_context(err: Error, context: &str) -> Error {
    match err {
        Error::Driver(msg) => Error::Driver(format!("{context}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::{ColumnInfo, ResultSet};
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::NamedTempFile;

    #[derive(Default)]
    struct FakeDriver {
        tables: Vec<String>,
        columns: HashMap<String, Vec<ColumnInfo>>,
        result: Option<ResultSet>,
        drivers: Vec<String>,
        connect_error: Option<String>,
        connects: Cell<usize>,
    }

    struct FakeConnection {
        tables: Vec<String>,
        columns: HashMap<String, Vec<ColumnInfo>>,
        result: Option<ResultSet>,
    }

    impl Driver for FakeDriver {
        fn connect<'a>(&'a self, _path: &Path) -> Result<Box<dyn Connection + 'a>, Error> {
            self.connects.set(self.connects.get() + 1);
            if let Some(msg) = &self.connect_error {
                return Err(Error::Driver(msg.clone()));
            }
            Ok(Box::new(FakeConnection {
                tables: self.tables.clone(),
                columns: self.columns.clone(),
                result: self.result.clone(),
            }))
        }

        fn driver_names(&self) -> Result<Vec<String>, Error> {
            Ok(self.drivers.clone())
        }
    }

    impl Connection for FakeConnection {
        fn tables(&mut self) -> Result<Vec<String>, Error> {
            Ok(self.tables.clone())
        }

        fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, Error> {
            Ok(self.columns.get(table).cloned().unwrap_or_default())
        }

        fn query(&mut self, _sql: &str) -> Result<Option<ResultSet>, Error> {
            Ok(self.result.clone())
        }
    }

    fn registry_with(file: &NamedTempFile) -> Registry {
        let mut map = BTreeMap::new();
        map.insert("default".to_string(), file.path().to_path_buf());
        Registry::new(map)
    }

    fn db_file() -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"not a real mdb").unwrap();
        f
    }

    #[test]
    fn list_tables_excludes_system_catalog() {
        let file = db_file();
        let driver = FakeDriver {
            tables: vec![
                "Orders".to_string(),
                "MSysObjects".to_string(),
                "Parts".to_string(),
                "MSysQueries".to_string(),
            ],
            ..Default::default()
        };
        let gw = Gateway::new(registry_with(&file), driver);

        let out = gw.list_tables(None).unwrap();
        assert_eq!(out, "Tables in database 'default':\nOrders\nParts");
        assert!(!out.contains("MSys"));
    }

    #[test]
    fn list_tables_empty_message() {
        let file = db_file();
        let gw = Gateway::new(registry_with(&file), FakeDriver::default());
        assert_eq!(
            gw.list_tables(None).unwrap(),
            "No tables found in database 'default'."
        );
    }

    #[test]
    fn unknown_database_never_reaches_driver() {
        let file = db_file();
        let gw = Gateway::new(registry_with(&file), FakeDriver::default());

        let err = gw.list_tables(Some("qa")).unwrap_err();
        assert!(matches!(err, Error::UnknownDatabase { .. }));
        assert_eq!(
            err.to_string(),
            "Database 'qa' not found. Available databases: default"
        );
        assert_eq!(gw.driver.connects.get(), 0);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let mut map = BTreeMap::new();
        map.insert("default".to_string(), PathBuf::from("/nonexistent/a.mdb"));
        let gw = Gateway::new(Registry::new(map), FakeDriver::default());

        let err = gw.query("SELECT 1", None).unwrap_err();
        assert!(matches!(err, Error::Unavailable(_)));
        assert!(err
            .to_string()
            .starts_with("Error: Database file not found at /nonexistent/a.mdb"));
    }

    #[test]
    fn non_select_rejected_without_driver_contact() {
        let file = db_file();
        let gw = Gateway::new(registry_with(&file), FakeDriver::default());

        let err = gw.query("DELETE FROM T", None).unwrap_err();
        assert!(matches!(err, Error::RejectedQuery));
        assert_eq!(gw.driver.connects.get(), 0);
    }

    #[test]
    fn lowercase_select_with_leading_whitespace_accepted() {
        let file = db_file();
        let driver = FakeDriver {
            result: Some(ResultSet {
                columns: vec!["1".to_string()],
                rows: vec![vec![Some("1".to_string())]],
            }),
            ..Default::default()
        };
        let gw = Gateway::new(registry_with(&file), driver);

        let out = gw.query("  select 1", None).unwrap();
        assert!(out.starts_with("Results from database 'default':"));
        assert_eq!(gw.driver.connects.get(), 1);
    }

    #[test]
    fn query_without_result_set_reports_no_results() {
        let file = db_file();
        let gw = Gateway::new(registry_with(&file), FakeDriver::default());
        assert_eq!(
            gw.query("SELECT 1", None).unwrap(),
            "Query executed successfully, but returned no results."
        );
    }

    #[test]
    fn driver_error_gets_query_context_and_advice() {
        let file = db_file();
        let driver = FakeDriver {
            connect_error: Some("state 42S02: table missing".to_string()),
            ..Default::default()
        };
        let gw = Gateway::new(registry_with(&file), driver);

        let err = gw.query("SELECT * FROM Ghost", None).unwrap_err();
        let msg = err.user_message();
        assert!(msg.starts_with("Error executing query: "));
        assert!(msg.contains("Use the list_tables tool"));
    }

    #[test]
    fn describe_table_reports_nullability() {
        let file = db_file();
        let mut columns = HashMap::new();
        columns.insert(
            "Orders".to_string(),
            vec![
                ColumnInfo {
                    name: "ID".to_string(),
                    type_name: "COUNTER".to_string(),
                    nullable: false,
                },
                ColumnInfo {
                    name: "Note".to_string(),
                    type_name: "LONGCHAR".to_string(),
                    nullable: true,
                },
            ],
        );
        let driver = FakeDriver {
            columns,
            ..Default::default()
        };
        let gw = Gateway::new(registry_with(&file), driver);

        let out = gw.describe_table("Orders", None).unwrap();
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("ID | COUNTER | No"));
        assert!(out.contains("Note | LONGCHAR | Yes"));
    }

    #[test]
    fn describe_unknown_table_merged_message() {
        let file = db_file();
        let gw = Gateway::new(registry_with(&file), FakeDriver::default());
        assert_eq!(
            gw.describe_table("Ghost", None).unwrap(),
            "Table 'Ghost' not found in database 'default' or has no columns."
        );
    }

    #[test]
    fn list_databases_marks_existence() {
        let file = db_file();
        let mut map = BTreeMap::new();
        map.insert("default".to_string(), file.path().to_path_buf());
        map.insert("qa".to_string(), PathBuf::from("/nonexistent/b.mdb"));
        let gw = Gateway::new(Registry::new(map), FakeDriver::default());

        let out = gw.list_databases();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("default: ") && lines[2].ends_with("[✓]"));
        assert!(lines[3].starts_with("qa: ") && lines[3].ends_with("[✗]"));
    }

    #[test]
    fn connection_info_without_access_driver() {
        let file = db_file();
        let driver = FakeDriver {
            drivers: vec!["PostgreSQL Unicode".to_string()],
            ..Default::default()
        };
        let gw = Gateway::new(registry_with(&file), driver);

        let out = gw.connection_info(None).unwrap();
        assert!(out.contains("Database file exists: Yes"));
        assert!(out.contains("- PostgreSQL Unicode"));
        assert!(out.contains("Microsoft Access ODBC driver available: No"));
        assert!(out.contains("RECOMMENDATION:"));
    }

    #[test]
    fn connection_info_with_access_driver() {
        let file = db_file();
        let driver = FakeDriver {
            drivers: vec!["Microsoft Access Driver (*.mdb, *.accdb)".to_string()],
            ..Default::default()
        };
        let gw = Gateway::new(registry_with(&file), driver);

        let out = gw.connection_info(None).unwrap();
        assert!(out.contains("Microsoft Access ODBC driver available: Yes"));
        assert!(!out.contains("RECOMMENDATION:"));
    }
}
