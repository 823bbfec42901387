use std::path::PathBuf;

/// Errors raised by the gateway before or while talking to the ODBC driver.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Database name is not present in the registry.
    #[error("Database '{name}' not found. Available databases: {}", .available.join(", "))]
    UnknownDatabase {
        name: String,
        available: Vec<String>,
    },

    /// Configured path does not exist on the filesystem.
    #[error("Error: Database file not found at {}. Please ensure the correct database file path is specified.", .0.display())]
    Unavailable(PathBuf),

    /// Any failure reported by the ODBC layer, message as the driver gave it
    /// (possibly with a handler-supplied context prefix).
    #[error("{0}")]
    Driver(String),

    /// Query did not pass the SELECT-only check.
    #[error("Error: Only SELECT queries are allowed for security reasons.")]
    RejectedQuery,

    /// Catch-all for failures outside the taxonomy above.
    #[error("{0}")]
    Unexpected(String),
}

/// Advisory appended when the Access ODBC driver is missing (SQLSTATE IM002).
pub(crate) const DRIVER_MISSING_ADVICE: &str = "\n\nThe Microsoft Access ODBC driver is not installed or configured properly. \
Please install the 'Microsoft Access Database Engine 2016 Redistributable' from Microsoft's website.";

/// Advisory appended when a referenced table does not exist (SQLSTATE 42S02).
pub(crate) const TABLE_MISSING_ADVICE: &str = "\n\nThe table referenced in your query does not exist. \
Use the list_tables tool to see available tables.";

impl Error {
    /// Render the error for the caller, appending advisory text for the
    /// recognized SQLSTATE codes embedded in driver messages.
    pub fn user_message(&self) -> String {
        let mut msg = self.to_string();
        if let Error::Driver(raw) = self {
            if raw.contains("IM002") {
                msg.push_str(DRIVER_MISSING_ADVICE);
            } else if raw.contains("42S02") {
                msg.push_str(TABLE_MISSING_ADVICE);
            }
        }
        msg
    }
}
