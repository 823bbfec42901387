//! Read-only MCP gateway for Microsoft Access databases over ODBC.
//!
//! A registry of named database files is built once at startup from the
//! environment; five tools (list databases, list tables, describe table,
//! run a SELECT query, connection diagnostics) resolve a name against the
//! registry, open a scoped ODBC connection, and render the driver's answer
//! as plain text.
//!
//! # Example
//!
//! ```no_run
//! use mdbgate::{Gateway, OdbcDriver, Registry};
//!
//! # fn main() -> Result<(), mdbgate::Error> {
//! let registry = Registry::from_sources(Some(r#"{"default": "/data/quality.mdb"}"#), None);
//! let gateway = Gateway::new(registry, OdbcDriver::new()?);
//!
//! let tables = gateway.list_tables(None)?;
//! let rows = gateway.query("SELECT TOP 5 * FROM Orders", None)?;
//! println!("{tables}\n{rows}");
//! # Ok(())
//! # }
//! ```
pub mod driver;
mod error;
pub mod format;
pub mod gateway;
pub mod odbc;
pub mod registry;
pub mod server;

pub use crate::error::Error;
pub use crate::gateway::Gateway;
pub use crate::odbc::OdbcDriver;
pub use crate::registry::Registry;
