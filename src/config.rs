//! Pack configuration module.
//!
//! Handles loading, validating, and merging `uipack.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; everything else keeps its
//! default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_path = "/ui"         # URL prefix for every registered route
//! out_prefix = "ui_"        # Prefix for group names and the routes header
//! source_extension = "h"    # Extension of generated source files
//!
//! static_dir = "static"     # Flat directory of hand-written assets
//! build_dir = "build"       # Web-UI build output (top-level *.html)
//! client_dir = ".svelte-kit/output/client"  # Relative to build_dir
//! server_dir = ".svelte-kit/output/server"  # Relative to build_dir
//! output_dir = "src"        # Where generated headers are written
//!
//! [processing]
//! max_processes = 4         # Max parallel compression workers (omit for auto)
//! ```
//!
//! Relative directories are resolved against the directory holding the
//! config file. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up when no explicit config path is given.
pub const CONFIG_FILENAME: &str = "uipack.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `uipack.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// URL prefix for routes. Empty, or starts with `/` without a trailing `/`.
    pub base_path: String,
    /// Prefix for group names and for the routes header file name.
    pub out_prefix: String,
    /// Extension of every generated source unit.
    pub source_extension: String,
    /// Flat directory of static assets (scanned non-recursively).
    pub static_dir: PathBuf,
    /// Web-UI build output directory.
    pub build_dir: PathBuf,
    /// Client output tree, relative to `build_dir`.
    pub client_dir: PathBuf,
    /// Server output tree, relative to `build_dir`.
    pub server_dir: PathBuf,
    /// Destination for generated headers.
    pub output_dir: PathBuf,
    /// Parallel compression settings.
    pub processing: ProcessingConfig,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            base_path: "/ui".to_string(),
            out_prefix: "ui_".to_string(),
            source_extension: "h".to_string(),
            static_dir: PathBuf::from("static"),
            build_dir: PathBuf::from("build"),
            client_dir: PathBuf::from(".svelte-kit/output/client"),
            server_dir: PathBuf::from(".svelte-kit/output/server"),
            output_dir: PathBuf::from("src"),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PackConfig {
    /// Validate config values are usable in generated code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.is_empty()
            && (!self.base_path.starts_with('/') || self.base_path.ends_with('/'))
        {
            return Err(ConfigError::Validation(format!(
                "base_path must be empty or start with '/' and not end with '/': {:?}",
                self.base_path
            )));
        }
        if self.base_path.contains(['"', '\\']) {
            return Err(ConfigError::Validation(
                "base_path must not contain quotes or backslashes".into(),
            ));
        }
        if !is_identifier_part(&self.out_prefix) {
            return Err(ConfigError::Validation(format!(
                "out_prefix must be a non-empty identifier fragment: {:?}",
                self.out_prefix
            )));
        }
        if !is_identifier_part(&self.source_extension) {
            return Err(ConfigError::Validation(format!(
                "source_extension must be a non-empty identifier fragment: {:?}",
                self.source_extension
            )));
        }
        Ok(())
    }

    /// Absolute (or cwd-relative) client tree location.
    pub fn client_root(&self) -> PathBuf {
        self.build_dir.join(&self.client_dir)
    }

    /// Absolute (or cwd-relative) server tree location.
    pub fn server_root(&self) -> PathBuf {
        self.build_dir.join(&self.server_dir)
    }

    /// File name of the routes unit, e.g. `ui_routes.h`.
    pub fn routes_file_name(&self) -> String {
        format!("{}routes.{}", self.out_prefix, self.source_extension)
    }

    /// Resolve relative input/output directories against `base`.
    ///
    /// `client_dir`/`server_dir` stay relative to `build_dir`.
    pub fn rebase(&mut self, base: &Path) {
        for dir in [
            &mut self.static_dir,
            &mut self.build_dir,
            &mut self.output_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}

fn is_identifier_part(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel compression workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PackConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<PackConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PackConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `uipack.toml` path.
///
/// A missing file yields the stock defaults. Relative directories in the
/// result are resolved against the file's parent directory.
pub fn load_config(path: &Path) -> Result<PackConfig, ConfigError> {
    let overlay = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Value>(&content)?)
    } else {
        None
    };
    let mut config = resolve_config(overlay)?;
    if let Some(parent) = path.parent() {
        config.rebase(parent);
    }
    Ok(config)
}

/// Returns a fully-commented stock `uipack.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# uipack Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
# Relative paths are resolved against the directory of this file.

# URL prefix for every route registered in setupRoutes().
# Either empty or starting with "/" (no trailing slash).
base_path = "/ui"

# Prefix for group header names (ui_js.h, ui_app_chunks_js.h, ...) and
# for the routes header (ui_routes.h).
out_prefix = "ui_"

# Extension of generated source files.
source_extension = "h"

# ---------------------------------------------------------------------------
# Inputs (missing directories are skipped)
# ---------------------------------------------------------------------------

# Flat directory of static assets (favicon, fonts). Not recursive.
static_dir = "static"

# Web-UI build output. Top-level *.html files become pages.
build_dir = "build"

# Client and server output trees, relative to build_dir. Scanned
# recursively; hidden files and *.json are skipped. Server assets get
# headers and handlers but no routes.
client_dir = ".svelte-kit/output/client"
server_dir = ".svelte-kit/output/server"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------

# Generated headers are written here, overwriting existing files.
output_dir = "src"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------

[processing]
# Maximum parallel compression workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
