//! Shared test utilities for the uipack test suite.
//!
//! Builds small project trees on disk that mirror a real web-UI build:
//!
//! ```text
//! <tmp>/
//! ├── build/
//! │   ├── index.html
//! │   ├── settings.html
//! │   └── .svelte-kit/output/
//! │       ├── client/_app/immutable/{chunks,entry}/*.js
//! │       ├── client/_app/version.json
//! │       └── server/index.js
//! └── static/
//!     ├── favicon.svg
//!     └── logo.png              # 500 incompressible bytes
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::PackConfig;

/// Default config with every directory rooted at `root`.
pub fn config_for(root: &Path) -> PackConfig {
    let mut config = PackConfig::default();
    config.rebase(root);
    config
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Highly repetitive HTML of roughly `len` bytes.
pub fn compressible_html(len: usize) -> Vec<u8> {
    let row = "<div class=\"row\"><span>uipack</span></div>\n";
    let mut html = String::from("<!doctype html>\n<html><body>\n");
    while html.len() + row.len() < len {
        html.push_str(row);
    }
    html.push_str("</body></html>\n");
    html.into_bytes()
}

/// Deterministic pseudo-random bytes that gzip cannot shrink.
pub fn incompressible_bytes(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// Create the standard project tree in a fresh temp directory.
pub fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let client = "build/.svelte-kit/output/client";
    let server = "build/.svelte-kit/output/server";

    write_file(root, "build/index.html", &compressible_html(2000));
    write_file(root, "build/settings.html", &compressible_html(1200));
    write_file(
        root,
        &format!("{client}/_app/immutable/chunks/index.B1Qk.js"),
        "export const a = 1;\n".repeat(40).as_bytes(),
    );
    write_file(
        root,
        &format!("{client}/_app/immutable/entry/app.DeF6.js"),
        "import './start.js';\n".repeat(20).as_bytes(),
    );
    write_file(
        root,
        &format!("{client}/_app/immutable/entry/start.C_df.js"),
        b"x",
    );
    write_file(root, &format!("{client}/_app/version.json"), b"{\"version\":\"1\"}");
    write_file(
        root,
        &format!("{server}/index.js"),
        "export function render() {}\n".repeat(10).as_bytes(),
    );
    write_file(
        root,
        "static/favicon.svg",
        "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect/><rect/><rect/></svg>\n"
            .repeat(5)
            .as_bytes(),
    );
    write_file(root, "static/logo.png", &incompressible_bytes(500));
    tmp
}
