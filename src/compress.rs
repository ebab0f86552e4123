//! Asset compression with raw fallback.
//!
//! Stage 3 of the pack pipeline. Every asset is gzipped at maximum effort
//! and the compressed buffer is kept only when it is strictly smaller than
//! the input. Already-dense formats (PNG, WOFF2, pre-compressed bundles,
//! tiny files) would otherwise grow by the gzip header and trailer.
//!
//! ## Reproducible output
//!
//! The gzip header normally carries a modification time and the OS of the
//! machine that wrote it. Both are pinned (mtime `0`, OS `255` = unknown) and
//! no file name is stored, so the same input always yields the same bytes on
//! every machine and generated headers stay diffable.
//!
//! ## Parallel Processing
//!
//! [`compress_groups`] compresses the assets of each group in parallel with
//! [rayon](https://docs.rs/rayon). Results are collected in input order, so
//! the output is identical to a sequential run.

use crate::group::Groups;
use crate::types::{Asset, CompressionStat};
use flate2::{Compression, GzBuilder};
use rayon::prelude::*;
use std::io::Write;
use thiserror::Error;

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Gzip header OS byte for "unknown".
const OS_UNKNOWN: u8 = 255;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Failed to compress {path}: {source}")]
    Gzip {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Final representation of one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    /// Gzip stream when `was_compressed`, otherwise the original bytes.
    pub bytes: Vec<u8>,
    pub was_compressed: bool,
    pub content_type: &'static str,
}

/// Gzip `content` at best compression with a fixed header.
pub fn gzip(content: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .operating_system(OS_UNKNOWN)
        .write(Vec::with_capacity(content.len() / 2), Compression::best());
    encoder.write_all(content)?;
    encoder.finish()
}

/// Resolve a content type from the file name's extension.
pub fn content_type(file_name: &str) -> &'static str {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Compress `content`, falling back to the raw bytes unless gzip is strictly smaller.
pub fn compress_asset(content: &[u8], file_name: &str) -> std::io::Result<Compressed> {
    let gz = gzip(content)?;
    let was_compressed = gz.len() < content.len();
    let bytes = if was_compressed { gz } else { content.to_vec() };
    Ok(Compressed {
        bytes,
        was_compressed,
        content_type: content_type(file_name),
    })
}

/// An asset paired with its final representation.
#[derive(Debug)]
pub struct PackedAsset<'a> {
    pub asset: &'a Asset,
    pub compressed: Compressed,
}

impl PackedAsset<'_> {
    pub fn stat(&self, group_name: &str) -> CompressionStat {
        CompressionStat {
            file_name: self.asset.path.clone(),
            input_size: self.asset.content.len(),
            compressed_size: self.compressed.bytes.len(),
            group_name: group_name.to_string(),
            use_compression: self.compressed.was_compressed,
        }
    }
}

/// A group whose assets have all been compressed.
#[derive(Debug)]
pub struct PackedGroup<'a> {
    pub name: &'a str,
    pub assets: Vec<PackedAsset<'a>>,
}

impl PackedGroup<'_> {
    /// Sum of final (emitted) sizes.
    pub fn compressed_size(&self) -> usize {
        self.assets.iter().map(|p| p.compressed.bytes.len()).sum()
    }

    pub fn stats(&self) -> impl Iterator<Item = CompressionStat> + '_ {
        self.assets.iter().map(|p| p.stat(self.name))
    }
}

/// Compress every asset of every group, keeping group and asset order.
pub fn compress_groups(groups: &Groups) -> Result<Vec<PackedGroup<'_>>, CompressError> {
    groups
        .iter()
        .map(|(name, assets)| {
            let packed = assets
                .par_iter()
                .map(|asset| {
                    compress_asset(&asset.content, asset.file_name())
                        .map(|compressed| PackedAsset { asset, compressed })
                        .map_err(|source| CompressError::Gzip {
                            path: asset.path.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok::<_, CompressError>(PackedGroup {
                name: name.as_str(),
                assets: packed,
            })
        })
        .collect()
}
