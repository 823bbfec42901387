use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Environment variable holding a JSON object of database name to file path.
pub const CONFIG_VAR: &str = "ACCESS_DB_CONFIG";

/// Environment variable holding a single database path, registered as "default".
pub const PATH_VAR: &str = "ACCESS_DB_PATH";

/// Name used when the caller omits `database_name`.
pub const DEFAULT_NAME: &str = "default";

/// Path used when neither environment variable is set.
const FALLBACK_PATH: &str =
    r"M:\Quality System Database\old\BE\2025\Quality System Database_be 3-2-25 Post Compact.mdb";

/// Immutable mapping from logical database name to file path, built once at
/// process start and injected into the gateway.
#[derive(Debug, Clone)]
pub struct Registry {
    databases: BTreeMap<String, PathBuf>,
}

impl Registry {
    pub fn new(databases: BTreeMap<String, PathBuf>) -> Self {
        Self { databases }
    }

    /// Build the registry from the process environment.
    pub fn from_env() -> Self {
        Self::from_sources(
            std::env::var(CONFIG_VAR).ok().as_deref(),
            std::env::var(PATH_VAR).ok().as_deref(),
        )
    }

    /// Build the registry from explicit configuration values.
    ///
    /// `config` is a JSON object of name to path and takes precedence. When it
    /// is absent or malformed, `single_path` (or the hardcoded fallback) is
    /// registered under the name `"default"`.
    pub fn from_sources(config: Option<&str>, single_path: Option<&str>) -> Self {
        let mut databases = BTreeMap::new();

        if let Some(raw) = config {
            match serde_json::from_str::<BTreeMap<String, PathBuf>>(raw) {
                Ok(parsed) => {
                    for (name, path) in parsed {
                        tracing::info!("Added database '{}' with path: {}", name, path.display());
                        databases.insert(name, path);
                    }
                }
                Err(e) => {
                    tracing::error!("Error parsing database configuration: {}", e);
                }
            }
        }

        if databases.is_empty() {
            let path = PathBuf::from(single_path.unwrap_or(FALLBACK_PATH));
            tracing::info!(
                "Using single database '{}' with path: {}",
                DEFAULT_NAME,
                path.display()
            );
            databases.insert(DEFAULT_NAME.to_string(), path);
        }

        Self { databases }
    }

    /// Resolve a database name (defaulting to `"default"`) to its configured
    /// path. Unknown names fail with a message enumerating every configured
    /// name.
    pub fn resolve(&self, name: Option<&str>) -> Result<&Path, Error> {
        let name = name.unwrap_or(DEFAULT_NAME);
        self.databases
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::UnknownDatabase {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.databases
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}
