//! Rendering of driver output into the plain-text responses callers receive.

use std::path::Path;

use crate::driver::{ColumnInfo, ResultSet};

/// Render a query result as an aligned textual table. NULL cells become the
/// literal `NULL`; row and column order are preserved as the driver returned
/// them.
pub fn result_set(database: &str, result: &ResultSet) -> String {
    let header = result.columns.join(" | ");
    let separator = "-".repeat(header.len());

    let mut lines = vec![
        format!("Results from database '{database}':"),
        header,
        separator,
    ];

    if result.rows.is_empty() {
        lines.push("No data found matching your query.".to_string());
        return lines.join("\n");
    }

    for row in &result.rows {
        let rendered: Vec<&str> = row
            .iter()
            .map(|cell| cell.as_deref().unwrap_or("NULL"))
            .collect();
        lines.push(rendered.join(" | "));
    }

    lines.join("\n")
}

/// Render the table listing, or the explicit empty message.
pub fn table_names(database: &str, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No tables found in database '{database}'.");
    }
    format!("Tables in database '{database}':\n{}", names.join("\n"))
}

/// Render column metadata for one table. Empty metadata is reported with the
/// merged not-found-or-empty message; ODBC does not distinguish the causes.
pub fn columns(table: &str, database: &str, cols: &[ColumnInfo]) -> String {
    if cols.is_empty() {
        return format!("Table '{table}' not found in database '{database}' or has no columns.");
    }

    let mut lines = vec![
        format!("Table: {table} (Database: {database})"),
        "-".repeat(table.len() + database.len() + 20),
        "Column Name | Data Type | Nullable".to_string(),
        "-".repeat(50),
    ];
    for col in cols {
        let nullable = if col.nullable { "Yes" } else { "No" };
        lines.push(format!("{} | {} | {}", col.name, col.type_name, nullable));
    }

    lines.join("\n")
}

/// Render the registry listing with a real filesystem existence marker per
/// entry.
pub fn databases<'a>(entries: impl Iterator<Item = (&'a str, &'a Path)>) -> String {
    let mut lines = vec![
        "Available Databases:".to_string(),
        "-------------------".to_string(),
    ];
    let mut any = false;
    for (name, path) in entries {
        any = true;
        let exists = if path.exists() { "✓" } else { "✗" };
        lines.push(format!("{}: {} [{}]", name, path.display(), exists));
    }

    if !any {
        return "No databases configured.".to_string();
    }
    lines.join("\n")
}

/// Render the connection diagnostics report.
pub fn connection_info(database: &str, path: &Path, drivers: &[String]) -> String {
    let mut lines = vec![
        format!("Database Connection Information for '{database}':"),
        "-----------------------------------".to_string(),
        format!("Database path: {}", path.display()),
        format!(
            "Database file exists: {}",
            if path.exists() { "Yes" } else { "No" }
        ),
        String::new(),
        "Available ODBC Drivers:".to_string(),
        "-----------------------------------".to_string(),
    ];

    if drivers.is_empty() {
        lines.push("No ODBC drivers found.".to_string());
    } else {
        for driver in drivers {
            lines.push(format!("- {driver}"));
        }
    }

    let access_available = drivers.iter().any(|d| d.contains("Access"));
    lines.push(String::new());
    lines.push(format!(
        "Microsoft Access ODBC driver available: {}",
        if access_available { "Yes" } else { "No" }
    ));

    if !access_available {
        lines.push(String::new());
        lines.push("RECOMMENDATION:".to_string());
        lines.push(
            "To fix the missing Access driver, please install the 'Microsoft Access Database Engine 2016 Redistributable'"
                .to_string(),
        );
        lines.push(
            "from Microsoft's website: https://www.microsoft.com/en-us/download/details.aspx?id=54920"
                .to_string(),
        );
    }

    lines.join("\n")
}
