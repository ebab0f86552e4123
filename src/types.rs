//! Shared types passed between pipeline stages.
//!
//! Assets are produced by [`scan`](crate::scan), bucketed by
//! [`group`](crate::group), and consumed read-only by
//! [`compress`](crate::compress) and [`emit`](crate::emit).

use crate::naming;

/// Where an asset is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Served directly by the device's own route table.
    DeviceServed,
    /// Packaged for a separate server-side consumer; never routed.
    ServerRendered,
}

impl Origin {
    pub fn is_server(self) -> bool {
        matches!(self, Origin::ServerRendered)
    }
}

/// One input file destined for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Path relative to its source root, `/`-separated.
    pub path: String,
    /// Sanitized identifier derived from `path`.
    pub name: String,
    /// Raw file bytes. Never modified after collection.
    pub content: Vec<u8>,
    /// Lowercase extension (or lowercase file name when there is none).
    pub kind: String,
    pub origin: Origin,
}

impl Asset {
    /// Build an asset from its relative path; `name` and `kind` are derived.
    pub fn new(path: impl Into<String>, content: Vec<u8>, origin: Origin) -> Self {
        let path = path.into();
        let name = naming::asset_name(&path);
        let kind = kind_of(&path);
        Self {
            path,
            name,
            content,
            kind,
            origin,
        }
    }

    /// File name component of `path`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// `path` without its `.html` extension, if it has one (any case).
    ///
    /// An extensionless file named `html` has kind `html` but no stem.
    pub fn html_stem(&self) -> Option<&str> {
        const EXT: &str = ".html";
        let split = self.path.len().checked_sub(EXT.len())?;
        let (stem, ext) = (self.path.get(..split)?, self.path.get(split..)?);
        let stem_name = stem.rsplit('/').next().unwrap_or(stem);
        (ext.eq_ignore_ascii_case(EXT) && !stem_name.is_empty()).then_some(stem)
    }

    pub fn is_html(&self) -> bool {
        self.html_stem().is_some()
    }

    pub fn symbol(&self) -> String {
        naming::symbol_name(&self.name)
    }

    pub fn handler(&self) -> String {
        naming::handler_name(&self.name)
    }
}

/// Lowercased text after the last `.` of the file name.
fn kind_of(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
}

/// Per-asset size record used by the compression report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionStat {
    pub file_name: String,
    pub input_size: usize,
    pub compressed_size: usize,
    pub group_name: String,
    pub use_compression: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_name_and_kind() {
        let asset = Asset::new("app/entry/start.C_df.JS", vec![], Origin::DeviceServed);
        assert_eq!(asset.name, "app_entry_start_C_df_JS");
        assert_eq!(asset.kind, "js");
        assert_eq!(asset.file_name(), "start.C_df.JS");
    }

    #[test]
    fn extensionless_kind_is_file_name() {
        let asset = Asset::new("LICENSE", vec![], Origin::DeviceServed);
        assert_eq!(asset.kind, "license");
    }

    #[test]
    fn html_detection_uses_extension() {
        assert!(Asset::new("about.HTML", vec![], Origin::DeviceServed).is_html());
        assert!(!Asset::new("about.htm", vec![], Origin::DeviceServed).is_html());
    }

    #[test]
    fn extensionless_html_file_is_not_a_page() {
        for path in ["html", "a/html", "a/.html"] {
            let asset = Asset::new(path, vec![], Origin::DeviceServed);
            assert_eq!(asset.kind, "html");
            assert!(!asset.is_html(), "{path}");
            assert_eq!(asset.html_stem(), None);
        }
    }

    #[test]
    fn html_stem_keeps_directories() {
        let asset = Asset::new("docs/Guide.Html", vec![], Origin::DeviceServed);
        assert_eq!(asset.html_stem(), Some("docs/Guide"));
    }

    #[test]
    fn symbol_and_handler_follow_name() {
        let asset = Asset::new("favicon.svg", vec![], Origin::DeviceServed);
        assert_eq!(asset.symbol(), "FAVICON_SVG");
        assert_eq!(asset.handler(), "serveFaviconSvg");
    }

    #[test]
    fn origin_server_flag() {
        assert!(Origin::ServerRendered.is_server());
        assert!(!Origin::DeviceServed.is_server());
    }
}
