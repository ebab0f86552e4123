//! Asset discovery.
//!
//! Stage 1 of the pack pipeline. Walks the configured source roots and reads
//! every embeddable file into an [`Asset`].
//!
//! ## Source Roots
//!
//! ```text
//! static/                          # Flat, non-recursive, device-served
//! │   ├── favicon.svg
//! │   └── .DS_Store                # Hidden: skipped
//! build/                           # Top level: *.html only, device-served
//! ├── index.html
//! ├── settings.html
//! └── .svelte-kit/output/
//!     ├── client/                  # Recursive, device-served
//!     │   ├── _app/immutable/entry/start.js
//!     │   └── _app/version.json    # JSON sidecar: skipped
//!     └── server/                  # Recursive, server-rendered (no routes)
//!         └── index.js
//! ```
//!
//! ## Ordering
//!
//! Roots are visited in the order build HTML, client tree, server tree,
//! static directory. Inside a root, entries are visited in file-name order,
//! so the asset list (and everything derived from it) is identical across
//! runs and machines.
//!
//! A root that does not exist contributes nothing; only read failures on
//! files that do exist abort the scan.

use crate::config::PackConfig;
use crate::types::{Asset, Origin};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    fn read(path: &Path, source: impl Into<std::io::Error>) -> Self {
        ScanError::Read {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// Which of the four source roots a [`RootScan`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Html,
    Client,
    Server,
    Static,
}

impl RootKind {
    pub fn label(self) -> &'static str {
        match self {
            RootKind::Html => "HTML",
            RootKind::Client => "client",
            RootKind::Server => "server",
            RootKind::Static => "static",
        }
    }
}

/// Discovery summary for one source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootScan {
    pub kind: RootKind,
    pub root: PathBuf,
    /// False when the directory does not exist.
    pub present: bool,
    pub count: usize,
}

/// Output of the scan stage.
#[derive(Debug)]
pub struct ScanResult {
    pub assets: Vec<Asset>,
    pub roots: Vec<RootScan>,
}

pub fn scan(config: &PackConfig) -> Result<ScanResult, ScanError> {
    let mut assets = Vec::new();
    let mut roots = Vec::new();

    let sources = [
        (RootKind::Html, config.build_dir.clone()),
        (RootKind::Client, config.client_root()),
        (RootKind::Server, config.server_root()),
        (RootKind::Static, config.static_dir.clone()),
    ];

    for (kind, root) in sources {
        let present = root.is_dir();
        let found = if present {
            match kind {
                RootKind::Html => scan_html(&root)?,
                RootKind::Client => scan_tree(&root, Origin::DeviceServed)?,
                RootKind::Server => scan_tree(&root, Origin::ServerRendered)?,
                RootKind::Static => scan_static(&root)?,
            }
        } else {
            Vec::new()
        };
        roots.push(RootScan {
            kind,
            root,
            present,
            count: found.len(),
        });
        assets.extend(found);
    }

    Ok(ScanResult { assets, roots })
}

/// Top-level `*.html` files of the build directory.
///
/// Pages are decoded as UTF-8 at the boundary; a page that is not valid
/// UTF-8 is a read failure rather than silently embedded garbage.
fn scan_html(root: &Path) -> Result<Vec<Asset>, ScanError> {
    let mut assets = Vec::new();
    for path in list_files(root)? {
        let name = file_name(&path);
        if is_hidden(&name) || !name.ends_with(".html") {
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|e| ScanError::read(&path, e))?;
        assets.push(Asset::new(name, text.into_bytes(), Origin::DeviceServed));
    }
    Ok(assets)
}

/// Every non-hidden file directly inside `root`.
fn scan_static(root: &Path) -> Result<Vec<Asset>, ScanError> {
    let mut assets = Vec::new();
    for path in list_files(root)? {
        let name = file_name(&path);
        if is_hidden(&name) {
            continue;
        }
        let content = fs::read(&path).map_err(|e| ScanError::read(&path, e))?;
        assets.push(Asset::new(name, content, Origin::DeviceServed));
    }
    Ok(assets)
}

/// Recursive walk skipping hidden files and JSON sidecars.
fn scan_tree(root: &Path, origin: Origin) -> Result<Vec<Asset>, ScanError> {
    let mut assets = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ScanError::read(&path, e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_hidden(&name) || is_build_metadata(&name) {
            continue;
        }
        let path = entry.path();
        let content = fs::read(path).map_err(|e| ScanError::read(path, e))?;
        assets.push(Asset::new(relative_path(path, root), content, origin));
    }
    Ok(assets)
}

/// Regular files directly inside `dir`, sorted by name.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ScanError::read(dir, e))? {
        let entry = entry.map_err(|e| ScanError::read(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Manifests and other JSON sidecars emitted by the web-UI build.
fn is_build_metadata(name: &str) -> bool {
    name.ends_with(".json")
}

/// `/`-separated path of `path` relative to `root`.
fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
