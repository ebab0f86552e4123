//! Centralized identifier derivation for generated sources.
//!
//! Every name that ends up in a generated header derives from an asset's
//! relative path through the functions in this module:
//!
//! | Input path                  | Asset name              | Symbol                  | Handler                     |
//! |-----------------------------|-------------------------|-------------------------|-----------------------------|
//! | `index.html`                | `index_html`            | `INDEX_HTML`            | `serveIndexHtml`            |
//! | `favicon.svg`               | `favicon_svg`           | `FAVICON_SVG`           | `serveFaviconSvg`           |
//! | `app/entry/start.C_df.js`   | `app_entry_start_C_df_js` | `APP_ENTRY_START_C_DF_JS` | `serveAppEntryStartCDfJs` |
//! | `404.html`                  | `404_html`              | `_404_HTML`             | `serve404Html`              |
//!
//! ## Character classes
//!
//! [`sanitize`] is total: ASCII letters, ASCII digits and `_` pass through,
//! every other character (path separators, dots, dashes, spaces, non-ASCII)
//! becomes a single `_`. Nothing is collapsed or trimmed, so the mapping is
//! length-preserving per character and trivially reproducible.
//!
//! Because different paths can sanitize to the same string (`a-b.js` and
//! `a_b.js`), the emitter checks the derived names for collisions before
//! rendering anything. See [`crate::emit::check_collisions`].

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Asset name: the relative path with separators and dots turned into `_`.
pub fn asset_name(path: &str) -> String {
    sanitize(path)
}

/// Constant name for an asset's byte array (`<SYMBOL>`) and size (`<SYMBOL>_L`).
///
/// Upper-cased sanitized name. A leading digit gets a `_` prefix so the
/// result is always a valid C identifier.
pub fn symbol_name(name: &str) -> String {
    let upper = sanitize(name).to_ascii_uppercase();
    if upper.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{upper}")
    } else {
        upper
    }
}

/// Split on anything that is not an ASCII alphanumeric and capitalize the
/// first letter of each word. The rest of each word is left as-is.
///
/// - `"index_html"` → `"IndexHtml"`
/// - `"start_C_dfYPXb_js"` → `"StartCDfYPXbJs"`
/// - `"nodes_0_js"` → `"Nodes0Js"`
pub fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    out
}

/// Handler function name: `serve` followed by the pascal-cased asset name.
pub fn handler_name(name: &str) -> String {
    format!("serve{}", pascal_case(name))
}

/// Format an integer with `,` as the thousands separator (`44210` → `44,210`).
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
