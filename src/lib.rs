//! # uipack
//!
//! Packages a compiled web UI into C++ headers for firmware that has no
//! filesystem. Every file becomes a `PROGMEM` byte array plus a handler for
//! ESPAsyncWebServer, and one routes header wires every handler to a URL.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Scan      static/ + build/  →  assets      (files → bytes)
//! 2. Group     assets            →  groups      (directory + kind + origin)
//! 3. Compress  groups            →  packed      (gzip, or raw when smaller)
//! 4. Emit      packed            →  src/*.h     (arrays, handlers, routes)
//! ```
//!
//! Each stage consumes the previous one in full. All outputs are rendered in
//! memory and written only after the whole run has succeeded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the source roots and reads every asset |
//! | [`group`] | Stage 2: maps assets to named groups in first-seen order |
//! | [`compress`] | Stage 3: gzip with raw fallback, MIME lookup |
//! | [`emit`] | Stage 4: renders group headers, routes header, collision guard |
//! | [`pipeline`] | Wires the stages together and writes the output directory |
//! | [`config`] | `uipack.toml` loading, defaults and validation |
//! | [`naming`] | Identifier sanitization, symbol and handler names |
//! | [`types`] | Shared types (`Asset`, `Origin`, `CompressionStat`) |
//! | [`output`] | CLI output formatting: discovery counts and compression report |
//!
//! # Design Decisions
//!
//! ## Reproducible Headers
//!
//! Generated headers are committed next to firmware sources, so they must
//! diff cleanly. Directory listings are sorted, groups keep first-seen order,
//! and the gzip header carries no timestamp: the same input tree always
//! produces byte-identical output.
//!
//! ## Smaller Wins
//!
//! Flash is the scarce resource. An asset is stored gzipped only if that is
//! strictly smaller than the raw bytes; images and tiny files are stored as-is
//! and served without a `Content-Encoding` header.
//!
//! ## Fail Before Writing
//!
//! Derived names (symbols, handlers, routes, header file names) are checked
//! for collisions before anything is compressed, and nothing is written until
//! every header has been rendered. A failed run leaves the previous output untouched.

pub mod compress;
pub mod config;
pub mod emit;
pub mod group;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
