use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use vcl_ledger::{ElectionConfig, HashScheme};

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vcl.toml";

/// Polling station configuration.
///
/// ```toml
/// [election]
/// candidates = ["Alice", "Bob", "Charlie"]
/// voter_id_digits = 12
///
/// [ledger]
/// path = "vcl-ledger.json"
/// hash_scheme = "framed"
///
/// [report]
/// results_dir = "."
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub election: ElectionConfig,
    pub ledger: LedgerConfig,
    pub report: ReportConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub path: PathBuf,
    /// Digest encoding for newly created ledgers. Existing ledgers keep
    /// the scheme recorded in their file.
    pub hash_scheme: HashScheme,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vcl-ledger.json"),
            hash_scheme: HashScheme::Framed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub results_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("."),
        }
    }
}

impl StationConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `vcl.toml` in the working
    /// directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE}; using built-in defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .election
            .validate()
            .with_context(|| format!("invalid election in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
