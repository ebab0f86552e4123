//! Header and route-table generation.
//!
//! Stage 4 of the pack pipeline. Renders compressed groups into C++ headers
//! for the ESPAsyncWebServer API:
//!
//! ```text
//! src/
//! ├── ui_html.h                      # One header per group: byte arrays + handlers
//! ├── ui__app_immutable_entry_js.h
//! ├── server_ui_js.h                 # Server-rendered: handlers, no routes
//! ├── ui_svg.h
//! └── ui_routes.h                    # Includes every group, defines setupRoutes()
//! ```
//!
//! ## Per-asset output
//!
//! ```cpp
//! // favicon.svg
//! const uint32_t FAVICON_SVG_L = 456;
//! const uint8_t FAVICON_SVG[] PROGMEM = {
//!   0x1f, 0x8b, 0x08, 0x00, ...
//! };
//!
//! inline void serveFaviconSvg(AsyncWebServerRequest* request) {
//!   AsyncWebServerResponse *response = request->beginResponse_P(200, "image/svg+xml", FAVICON_SVG, FAVICON_SVG_L);
//!   response->addHeader(F("Content-Encoding"), "gzip");
//!   request->send(response);
//! }
//! ```
//!
//! The `Content-Encoding` line is only present when the gzip stream was kept.
//!
//! ## Routes
//!
//! Device-served assets are registered under the base path. HTML pages are
//! reachable with and without their extension, except `index.html` which is
//! only reachable at the bare base path:
//!
//! | Asset            | Routes                          |
//! |------------------|---------------------------------|
//! | `favicon.svg`    | `/ui/favicon.svg`               |
//! | `index.html`     | `/ui/`                          |
//! | `settings.html`  | `/ui/settings`, `/ui/settings.html` |
//!
//! Server-rendered assets get a header and a handler but no route.

use crate::compress::{PackedAsset, PackedGroup};
use crate::config::PackConfig;
use crate::group::Groups;
use crate::naming::format_thousands;
use crate::types::{Asset, Origin};
use std::collections::HashMap;
use thiserror::Error;

/// Bytes per line in generated hex dumps.
const HEX_BYTES_PER_LINE: usize = 16;

/// Owner reported when an asset group would overwrite the routes unit.
const ROUTES_UNIT: &str = "the routes header";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Naming collision: {kind} `{name}` is derived from both {first} and {second}")]
    NamingCollision {
        kind: &'static str,
        name: String,
        first: String,
        second: String,
    },
}

/// One generated source unit, rendered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub contents: String,
}

/// A URL path bound to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub handler: String,
}

/// Everything the emit stage produces.
#[derive(Debug)]
pub struct Emitted {
    /// Group headers in first-seen group order, then the routes header.
    pub files: Vec<GeneratedFile>,
    pub routes: Vec<Route>,
}

/// Routes for a single asset. Empty for server-rendered assets.
pub fn routes_for(asset: &Asset, base_path: &str) -> Vec<Route> {
    if asset.origin == Origin::ServerRendered {
        return Vec::new();
    }
    let handler = asset.handler();
    let Some(stem) = asset.html_stem() else {
        return vec![Route {
            path: format!("{base_path}/{}", asset.path),
            handler,
        }];
    };
    if asset.path == "index.html" {
        return vec![Route {
            path: format!("{base_path}/"),
            handler,
        }];
    }
    vec![
        Route {
            path: format!("{base_path}/{stem}"),
            handler: handler.clone(),
        },
        Route {
            path: format!("{base_path}/{}", asset.path),
            handler,
        },
    ]
}

/// Every route of every group, in group-then-asset order.
pub fn collect_routes<'a>(
    assets: impl IntoIterator<Item = &'a Asset>,
    base_path: &str,
) -> Vec<Route> {
    assets
        .into_iter()
        .flat_map(|asset| routes_for(asset, base_path))
        .collect()
}

/// Fail if two assets derive the same symbol, handler, route, or file name.
///
/// All group headers are included into one routes unit, so symbols and
/// handlers must be unique across the whole run, not just per group. Group
/// headers share the output directory with the routes unit, so no group may
/// take its file name.
pub fn check_collisions(groups: &Groups, config: &PackConfig) -> Result<(), EmitError> {
    let mut symbols: HashMap<String, &str> = HashMap::new();
    let mut handlers: HashMap<String, &str> = HashMap::new();
    let mut routes: HashMap<String, &str> = HashMap::new();
    let mut files: HashMap<String, &str> = HashMap::new();
    files.insert(config.routes_file_name(), ROUTES_UNIT);

    for (group, assets) in groups {
        let file_name = group_file_name(group, &config.source_extension);
        if let Some(first) = assets.first() {
            claim(&mut files, "file", file_name, &first.path)?;
        }
        for asset in assets {
            let path = asset.path.as_str();
            claim(&mut symbols, "symbol", asset.symbol(), path)?;
            claim(&mut handlers, "handler", asset.handler(), path)?;
            for route in routes_for(asset, &config.base_path) {
                claim(&mut routes, "route", route.path, path)?;
            }
        }
    }
    Ok(())
}

fn group_file_name(group: &str, source_extension: &str) -> String {
    format!("{group}.{source_extension}")
}

fn claim<'a>(
    seen: &mut HashMap<String, &'a str>,
    kind: &'static str,
    name: String,
    path: &'a str,
) -> Result<(), EmitError> {
    if let Some(first) = seen.get(&name) {
        return Err(EmitError::NamingCollision {
            kind,
            name,
            first: (*first).to_string(),
            second: path.to_string(),
        });
    }
    seen.insert(name, path);
    Ok(())
}

/// Render bytes as `0x..` literals, 16 per line, two-space indented.
pub fn hexdump(bytes: &[u8]) -> String {
    bytes
        .chunks(HEX_BYTES_PER_LINE)
        .map(|line| {
            let hex: Vec<String> = line.iter().map(|b| format!("0x{b:02x}")).collect();
            format!("  {}", hex.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Escape a string for use inside a C string literal.
///
/// Control characters without a short escape become three-digit octal
/// escapes, which never absorb a following hex digit the way `\x` does.
fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Asset path as a single-line `//` comment.
///
/// A trailing backslash would splice the next line into the comment, so
/// such paths are quoted.
fn path_comment(path: &str) -> String {
    let text = c_string(path);
    if text.ends_with('\\') {
        format!("// \"{text}\"\n")
    } else {
        format!("// {text}\n")
    }
}

/// Size constant, byte array and handler for one asset.
pub fn render_asset(packed: &PackedAsset<'_>) -> String {
    let asset = packed.asset;
    let compressed = &packed.compressed;
    let symbol = asset.symbol();

    let mut out = path_comment(&asset.path);
    out.push_str(&format!(
        "const uint32_t {symbol}_L = {};\n",
        compressed.bytes.len()
    ));
    out.push_str(&format!(
        "const uint8_t {symbol}[] PROGMEM = {{\n{}\n}};\n\n",
        hexdump(&compressed.bytes)
    ));
    out.push_str(&format!(
        "inline void {}(AsyncWebServerRequest* request) {{\n",
        asset.handler()
    ));
    out.push_str(&format!(
        "  AsyncWebServerResponse *response = request->beginResponse_P(200, \"{}\", {symbol}, {symbol}_L);\n",
        c_string(compressed.content_type)
    ));
    if compressed.was_compressed {
        out.push_str("  response->addHeader(F(\"Content-Encoding\"), \"gzip\");\n");
    }
    out.push_str("  request->send(response);\n");
    out.push_str("}\n\n");
    out
}

/// Header for one group: banner, includes, then every asset in order.
pub fn render_group(group: &PackedGroup<'_>, source_extension: &str) -> GeneratedFile {
    let mut contents = format!(
        "/*\n * Binary arrays for the Web UI {} files.\n */\n\n\
         #pragma once\n\
         #include <ESPAsyncWebServer.h>\n\
         #include <Arduino.h>\n\n",
        group.name
    );
    for packed in &group.assets {
        contents.push_str(&render_asset(packed));
    }
    GeneratedFile {
        file_name: group_file_name(group.name, source_extension),
        contents,
    }
}

/// The routes unit: size summary, group includes, and `setupRoutes()`.
pub fn render_routes(
    groups: &[PackedGroup<'_>],
    routes: &[Route],
    file_name: String,
    source_extension: &str,
) -> GeneratedFile {
    let total: usize = groups.iter().map(PackedGroup::compressed_size).sum();

    let mut contents = String::from("/*\n * Web UI Routes\n *\n * Compressed Size Summary:\n");
    for group in groups {
        contents.push_str(&format!(
            " * {}: {} bytes\n",
            group.name,
            format_thousands(group.compressed_size())
        ));
    }
    contents.push_str(&format!(
        " * Total: {} bytes\n */\n\n",
        format_thousands(total)
    ));

    contents.push_str("#pragma once\n\n#include <ESPAsyncWebServer.h>\n");
    for group in groups {
        contents.push_str(&format!(
            "#include \"{}\"\n",
            group_file_name(group.name, source_extension)
        ));
    }

    contents.push_str("\ninline void setupRoutes(AsyncWebServer* server) {\n");
    for route in routes {
        contents.push_str(&format!(
            "    server->on(\"{}\", HTTP_GET, {});\n",
            c_string(&route.path),
            route.handler
        ));
    }
    contents.push_str("}\n");

    GeneratedFile {
        file_name,
        contents,
    }
}

/// Render every group header and the routes header.
pub fn emit(groups: &[PackedGroup<'_>], config: &PackConfig) -> Emitted {
    let routes = collect_routes(
        groups.iter().flat_map(|g| g.assets.iter().map(|p| p.asset)),
        &config.base_path,
    );
    let mut files: Vec<GeneratedFile> = groups
        .iter()
        .map(|g| render_group(g, &config.source_extension))
        .collect();
    files.push(render_routes(
        groups,
        &routes,
        config.routes_file_name(),
        &config.source_extension,
    ));
    Emitted { files, routes }
}
