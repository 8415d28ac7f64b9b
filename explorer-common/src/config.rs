//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Compiled-in upstream endpoints. These are the published Apps Script
/// exports the dashboard reads; both can be overridden in config.toml.
pub const DEFAULT_PRODUCTION_URL: &str =
    "https://script.google.com/macros/s/AKfycbx5JakaAEwidZ3b9PzTIVV4VeefbRIyA6TaG8OJdNH5ZIgND8FL5ePhV1OughnE3E6Q/exec";
pub const DEFAULT_FAILURES_URL: &str =
    "https://script.google.com/macros/s/AKfycbzWtySKBpu3w7GwZIB3fOHYPO93WkEyqMHuYf_lcZe2gN3B7lp-63tRsvpsX8qd50gVRA/exec";

/// Default listen port for the dashboard service
pub const DEFAULT_PORT: u16 = 5726;

/// Station display order on the dashboard. Processes not listed here are
/// appended alphabetically after these.
pub const PROCESS_ORDER: &[&str] = &[
    "IFLASH", "UCT", "FODTEST", "XCVR_LT", "LCDCAL", "L2VISION", "L2AR",
    "DEPTHCAL", "DEPTHVAL", "TELECAL", "TELEVAL", "CFC",
];

/// Manually-entered station fields tracked per day alongside the KPI fields
pub const MANUAL_FIELDS: &[&str] = &["CQA1", "RUNNING", "CQA2", "CQA1 Def.", "CQA2 Def."];

/// First-test-yield targets (percent) per process
pub const FTY_TARGETS: &[(&str, f64)] = &[
    ("UCT", 98.0),
    ("FODTEST", 98.0),
    ("XCVR_LT", 95.0),
    ("LCDCAL", 98.0),
    ("L2VISION", 95.0),
    ("L2AR", 95.0),
    ("DEPTHCAL", 98.0),
    ("DEPTHVAL", 98.0),
    ("TELECAL", 98.0),
    ("TELEVAL", 98.0),
    ("CFC", 98.0),
];

/// Dashboard configuration, loaded from config.toml with compiled defaults
/// for every key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Production records endpoint
    pub production_url: String,
    /// Tried when the production endpoint returns a non-success status
    pub production_fallback_url: Option<String>,
    /// Failure records endpoint
    pub failures_url: String,
    /// Tried when the failures endpoint returns a non-success status
    pub failures_fallback_url: Option<String>,
    /// Listen port
    pub port: u16,
    /// Station display order
    pub process_order: Vec<String>,
    /// Manual per-day station fields
    pub manual_fields: Vec<String>,
    /// FTY targets (percent) per process
    pub fty_targets: BTreeMap<String, f64>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            production_url: DEFAULT_PRODUCTION_URL.to_string(),
            production_fallback_url: None,
            failures_url: DEFAULT_FAILURES_URL.to_string(),
            failures_fallback_url: None,
            port: DEFAULT_PORT,
            process_order: PROCESS_ORDER.iter().map(|s| s.to_string()).collect(),
            manual_fields: MANUAL_FIELDS.iter().map(|s| s.to_string()).collect(),
            fty_targets: FTY_TARGETS
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

impl DashConfig {
    /// Load configuration from the platform config file, falling back to
    /// compiled defaults when no file exists. A file that exists but does
    /// not parse is an error; silently ignoring it would mask typos.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// FTY target for a process, if one is configured
    pub fn fty_target(&self, process: &str) -> Option<f64> {
        self.fty_targets.get(process).copied()
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        tracing::info!("Created root folder: {}", root.display());
    }
    Ok(())
}

/// Locate the platform config file, if present
fn find_config_file() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/explorer-dash/config.toml first, then /etc
        if let Some(path) = dirs::config_dir().map(|d| d.join("explorer-dash").join("config.toml"))
        {
            if path.exists() {
                return Some(path);
            }
        }
        let system_config = PathBuf::from("/etc/explorer-dash/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        None
    } else {
        dirs::config_dir()
            .map(|d| d.join("explorer-dash").join("config.toml"))
            .filter(|p| p.exists())
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("explorer-dash"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/explorer-dash"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("explorer-dash"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/explorer-dash"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("explorer-dash"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\explorer-dash"))
    } else {
        PathBuf::from("./explorer_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_full_process_order() {
        let config = DashConfig::default();
        assert_eq!(config.process_order.len(), 12);
        assert_eq!(config.process_order[0], "IFLASH");
        assert_eq!(config.process_order[11], "CFC");
    }

    #[test]
    fn defaults_carry_fty_targets() {
        let config = DashConfig::default();
        assert_eq!(config.fty_target("UCT"), Some(98.0));
        assert_eq!(config.fty_target("XCVR_LT"), Some(95.0));
        // IFLASH has no target configured
        assert_eq!(config.fty_target("IFLASH"), None);
    }

    #[test]
    fn cli_arg_wins_over_env() {
        let cli = PathBuf::from("/tmp/from-cli");
        let resolved = resolve_root_folder(Some(&cli), "EXPLORER_TEST_UNSET_VAR");
        assert_eq!(resolved, cli);
    }
}
