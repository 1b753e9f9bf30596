//! TOML configuration for the CLI
//!
//! ```toml
//! [store]
//! db = ".celldelta/ledger.db"
//! cas = ".celldelta/cas"
//!
//! [scope]
//! region = "muenchen"
//! operator = "telekom"
//!
//! [logging]
//! profile = "production"
//! ```
//!
//! Every key is optional. Command-line flags win over file values.

use std::path::{Path, PathBuf};

use celldelta_core::errors::{CellDeltaError, Result};
use celldelta_core::logging_facility::Profile;
use celldelta_core::scope::IngestScope;
use celldelta_store::SqliteSnapshotStore;
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "celldelta.toml";
pub const DEFAULT_DB_PATH: &str = ".celldelta/ledger.db";
pub const DEFAULT_CAS_PATH: &str = ".celldelta/cas";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub store: StoreSection,
    pub scope: ScopeSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub db: Option<PathBuf>,
    pub cas: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeSection {
    pub region: Option<String>,
    pub operator: Option<String>,
    pub mcc: Option<u16>,
    pub mncs: Vec<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub profile: Option<String>,
}

impl CliConfig {
    /// Load `explicit`, or the default file if it exists, or nothing
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if an explicit file is missing or any file fails to
    /// parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CellDeltaError::InvalidConfig {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::parse(&text).map_err(|e| CellDeltaError::InvalidConfig {
            reason: format!("{}: {}", path.display(), e),
        })
    }

    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// Returns the `toml` error for malformed input or unknown keys.
    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Logging profile, defaulting to development
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an unknown profile name.
    pub fn profile(&self) -> Result<Profile> {
        match self.logging.profile.as_deref() {
            None => Ok(Profile::Development),
            Some(name) => Profile::parse(name).ok_or_else(|| CellDeltaError::InvalidConfig {
                reason: format!("unknown logging profile '{}'", name),
            }),
        }
    }
}

/// Store location after merging flags over the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub db: PathBuf,
    pub cas: PathBuf,
}

impl StoreLocation {
    pub fn resolve(config: &CliConfig, db_flag: Option<PathBuf>, cas_flag: Option<PathBuf>) -> Self {
        Self {
            db: db_flag
                .or_else(|| config.store.db.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            cas: cas_flag
                .or_else(|| config.store.cas.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CAS_PATH)),
        }
    }

    /// # Errors
    ///
    /// `StoreUnavailable` if the ledger cannot be opened or migrated.
    pub fn open(&self) -> Result<SqliteSnapshotStore> {
        SqliteSnapshotStore::open(&self.db, self.cas.clone())
    }
}

/// Scope flags given on the command line
#[derive(Debug, Clone, Default)]
pub struct ScopeOverrides {
    pub region: Option<String>,
    pub operator: Option<String>,
    pub mcc: Option<u16>,
    pub mncs: Vec<u16>,
}

/// Merge scope flags over the `[scope]` section
///
/// Presets apply first; explicit `mcc`/`mncs` then override what an
/// operator preset implied.
///
/// # Errors
///
/// `InvalidConfig` for an unknown region or operator.
pub fn resolve_scope(config: &ScopeSection, flags: ScopeOverrides) -> Result<IngestScope> {
    let region = flags.region.or_else(|| config.region.clone());
    let operator = flags.operator.or_else(|| config.operator.clone());
    let mut scope = IngestScope::from_presets(region.as_deref(), operator.as_deref())?;

    if let Some(mcc) = flags.mcc.or(config.mcc) {
        scope = scope.with_mcc(mcc);
    }
    let mncs = if flags.mncs.is_empty() {
        config.mncs.clone()
    } else {
        flags.mncs
    };
    if !mncs.is_empty() {
        scope = scope.with_mncs(mncs);
    }
    Ok(scope)
}
