//! Asset grouping.
//!
//! Stage 2 of the pack pipeline. Every asset maps to exactly one group, and
//! every group becomes one generated header. The mapping is a pure function
//! of the asset's path, kind and origin:
//!
//! ```text
//! favicon.svg                          → ui_svg
//! index.html                           → ui_html
//! _app/immutable/entry/start.js        → ui__app_immutable_entry_js
//! index.js  (server tree)              → server_ui_js
//! ```
//!
//! Groups are created the first time an asset maps to them and keep their
//! members in discovery order. The resulting map preserves first-seen group
//! order, which is the order headers are emitted and routes are registered.

use crate::naming::sanitize;
use crate::types::Asset;
use indexmap::IndexMap;

/// Prefix added to groups of server-rendered assets.
pub const SERVER_PREFIX: &str = "server_";

/// Groups in first-seen order, members in discovery order.
pub type Groups = IndexMap<String, Vec<Asset>>;

/// Group name for an asset.
pub fn group_name(asset: &Asset, prefix: &str) -> String {
    let dir = match asset.path.rfind('/') {
        Some(idx) => &asset.path[..idx],
        None => "",
    };
    let kind = sanitize(&asset.kind);
    let name = if dir.is_empty() {
        format!("{prefix}{kind}")
    } else {
        format!("{prefix}{}_{kind}", sanitize(dir))
    };
    if asset.origin.is_server() {
        format!("{SERVER_PREFIX}{name}")
    } else {
        name
    }
}

/// Partition assets into groups, preserving first-seen order.
pub fn group_assets(assets: Vec<Asset>, prefix: &str) -> Groups {
    let mut groups = Groups::new();
    for asset in assets {
        groups
            .entry(group_name(&asset, prefix))
            .or_default()
            .push(asset);
    }
    groups
}
