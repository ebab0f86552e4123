//! CLI output formatting for all pipeline stages.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Captured 2 HTML assets from build
//! Captured 14 client assets from build/.svelte-kit/output/client
//! Skipped server assets: build/.svelte-kit/output/server not found
//! Captured 1 static assets from static
//!
//! Groups
//! ui_html (2 assets)
//!     index.html
//!     settings.html
//! ```
//!
//! ## Compression report
//!
//! ```text
//! Generating C++ headers for web UI assets:
//! ────────────────────────────────────────── (100 columns)
//! index.html                      2.05 kB    gzip         600 B (28.6%)
//!
//! logo.png                        500 B      uncompressed 500 B (100.0%)
//!
//! ──────────────────────────────────────────
//! Total compressed size: 1.07 kB (42.3% of 2.54 kB)
//! ```
//!
//! Rows are sorted by group name, then by compressed size (largest first),
//! with a blank line between groups.
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::emit::GeneratedFile;
use crate::group::Groups;
use crate::scan::RootScan;
use crate::types::CompressionStat;
use std::path::Path;

/// Width of the horizontal rules around the report.
const RULE_WIDTH: usize = 100;

/// Human-readable size: bytes below 1 KiB, otherwise kB with two decimals.
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    format!("{:.2} kB", bytes as f64 / 1024.0)
}

/// `part / whole * 100`. An empty input counts as fully retained.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 100.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

// ============================================================================
// Scan output
// ============================================================================

/// One line per source root with its discovery count.
pub fn format_roots(roots: &[RootScan]) -> Vec<String> {
    roots
        .iter()
        .map(|r| {
            if r.present {
                format!(
                    "Captured {} {} assets from {}",
                    r.count,
                    r.kind.label(),
                    r.root.display()
                )
            } else {
                format!(
                    "Skipped {} assets: {} not found",
                    r.kind.label(),
                    r.root.display()
                )
            }
        })
        .collect()
}

/// Group inventory: group header with member count, then indented paths.
pub fn format_groups(groups: &Groups) -> Vec<String> {
    let mut lines = vec!["Groups".to_string()];
    for (name, assets) in groups {
        lines.push(format!("{name} ({} assets)", assets.len()));
        for asset in assets {
            lines.push(format!("    {}", asset.path));
        }
    }
    lines
}

pub fn format_scan_output(roots: &[RootScan], groups: &Groups) -> Vec<String> {
    let mut lines = format_roots(roots);
    if !groups.is_empty() {
        lines.push(String::new());
        lines.extend(format_groups(groups));
    }
    lines
}

pub fn print_scan_output(roots: &[RootScan], groups: &Groups) {
    for line in format_scan_output(roots, groups) {
        println!("{}", line);
    }
}

// ============================================================================
// Compression report
// ============================================================================

/// Sort stats by group name, then by compressed size descending.
///
/// The sort is stable, so equal sizes keep discovery order.
pub fn sort_stats(stats: &mut [CompressionStat]) {
    stats.sort_by(|a, b| {
        a.group_name
            .cmp(&b.group_name)
            .then(b.compressed_size.cmp(&a.compressed_size))
    });
}

fn format_stat(stat: &CompressionStat) -> String {
    let label = if stat.use_compression {
        "gzip"
    } else {
        "uncompressed"
    };
    format!(
        "{:<70} {:<10} {:<12} {} ({:.1}%)",
        stat.file_name,
        format_size(stat.input_size),
        label,
        format_size(stat.compressed_size),
        percent(stat.compressed_size, stat.input_size)
    )
}

/// Totals line: compressed size as a share of input size.
pub fn format_total(stats: &[CompressionStat]) -> String {
    let input: usize = stats.iter().map(|s| s.input_size).sum();
    let compressed: usize = stats.iter().map(|s| s.compressed_size).sum();
    format!(
        "Total compressed size: {} ({:.1}% of {})",
        format_size(compressed),
        percent(compressed, input),
        format_size(input)
    )
}

/// Full compression report, grouped and sorted.
pub fn format_report(stats: &[CompressionStat]) -> Vec<String> {
    let mut sorted = stats.to_vec();
    sort_stats(&mut sorted);

    let mut lines = vec![
        "Generating C++ headers for web UI assets:".to_string(),
        rule(),
    ];
    let mut current_group: Option<&str> = None;
    for stat in &sorted {
        if let Some(group) = current_group
            && group != stat.group_name
        {
            lines.push(String::new());
        }
        current_group = Some(stat.group_name.as_str());
        lines.push(format_stat(stat));
    }
    lines.push(String::new());
    lines.push(rule());
    lines.push(format_total(&sorted));
    lines
}

pub fn print_report(stats: &[CompressionStat]) {
    for line in format_report(stats) {
        println!("{}", line);
    }
}

// ============================================================================
// Write output
// ============================================================================

pub fn format_written(files: &[GeneratedFile], output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = files
        .iter()
        .map(|f| format!("Wrote {}", output_dir.join(&f.file_name).display()))
        .collect();
    lines.push(format!(
        "Generated {} headers in {}",
        files.len(),
        output_dir.display()
    ));
    lines
}

pub fn print_written(files: &[GeneratedFile], output_dir: &Path) {
    for line in format_written(files, output_dir) {
        println!("{}", line);
    }
}
