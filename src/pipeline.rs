//! End-to-end pack pipeline.
//!
//! ```text
//! 1. Scan      roots    →  Vec<Asset>          (filesystem → bytes)
//! 2. Group     assets   →  Groups              (ordered buckets)
//! 3. Compress  groups   →  Vec<PackedGroup>    (gzip or raw)
//! 4. Emit      packed   →  Vec<GeneratedFile>  (headers + routes, in memory)
//! 5. Write     files    →  output_dir/
//! ```
//!
//! Nothing is written until every stage has succeeded, so a failed run never
//! leaves a half-updated output directory behind.

use crate::compress::{self, CompressError};
use crate::config::{ConfigError, PackConfig};
use crate::emit::{self, EmitError, Emitted, GeneratedFile};
use crate::group::{self, Groups};
use crate::scan::{self, RootScan, ScanError};
use crate::types::CompressionStat;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Compress(#[from] CompressError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scan and group without compressing or writing anything.
#[derive(Debug)]
pub struct Plan {
    pub roots: Vec<RootScan>,
    pub groups: Groups,
}

/// Result of a full run: discovery counts, per-asset stats, rendered files.
#[derive(Debug)]
pub struct BuildOutput {
    pub roots: Vec<RootScan>,
    /// Per-asset stats in group-then-asset order (unsorted).
    pub stats: Vec<CompressionStat>,
    pub emitted: Emitted,
}

pub fn plan(config: &PackConfig) -> Result<Plan, PipelineError> {
    config.validate()?;
    let scanned = scan::scan(config)?;
    let groups = group::group_assets(scanned.assets, &config.out_prefix);
    emit::check_collisions(&groups, config)?;
    Ok(Plan {
        roots: scanned.roots,
        groups,
    })
}

/// Run every stage in memory. Touches the filesystem only for reads.
pub fn render(config: &PackConfig) -> Result<BuildOutput, PipelineError> {
    let Plan { roots, groups } = plan(config)?;
    let packed = compress::compress_groups(&groups)?;
    let stats = packed.iter().flat_map(|g| g.stats()).collect();
    let emitted = emit::emit(&packed, config);
    Ok(BuildOutput {
        roots,
        stats,
        emitted,
    })
}

/// Create `output_dir` and write every file, overwriting existing ones.
pub fn write_files(files: &[GeneratedFile], output_dir: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(output_dir).map_err(|source| PipelineError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    for file in files {
        let path = output_dir.join(&file.file_name);
        fs::write(&path, &file.contents).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Full run: render everything, then write to `config.output_dir`.
pub fn build(config: &PackConfig) -> Result<BuildOutput, PipelineError> {
    let output = render(config)?;
    write_files(&output.emitted.files, &config.output_dir)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn plan_groups_project_in_first_seen_order() {
        let tmp = setup_project();
        let plan = plan(&config_for(tmp.path())).unwrap();

        let names: Vec<&str> = plan.groups.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "ui_html",
                "ui__app_immutable_chunks_js",
                "ui__app_immutable_entry_js",
                "server_ui_js",
                "ui_svg",
                "ui_png",
            ]
        );
    }

    #[test]
    fn build_writes_every_header() {
        let tmp = setup_project();
        let config = config_for(tmp.path());
        let output = build(&config).unwrap();

        assert_eq!(output.emitted.files.len(), 7);
        for file in &output.emitted.files {
            let on_disk = fs::read_to_string(config.output_dir.join(&file.file_name)).unwrap();
            assert_eq!(on_disk, file.contents);
        }
        assert!(config.output_dir.join("ui_routes.h").exists());
    }

    #[test]
    fn stats_cover_every_asset() {
        let tmp = setup_project();
        let output = render(&config_for(tmp.path())).unwrap();

        assert_eq!(output.stats.len(), 8);
        let logo = output.stats.iter().find(|s| s.file_name == "logo.png").unwrap();
        assert!(!logo.use_compression);
        assert_eq!(logo.compressed_size, 500);

        let index = output.stats.iter().find(|s| s.file_name == "index.html").unwrap();
        assert!(index.use_compression);
        assert!(index.compressed_size < index.input_size);
    }

    #[test]
    fn render_does_not_write() {
        let tmp = setup_project();
        let config = config_for(tmp.path());
        render(&config).unwrap();
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn collision_aborts_before_writing() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "static/a-b.js", b"1");
        write_file(tmp.path(), "static/a_b.js", b"2");
        let config = config_for(tmp.path());

        let result = build(&config);
        assert!(matches!(
            result,
            Err(PipelineError::Emit(EmitError::NamingCollision { .. }))
        ));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn asset_shadowing_routes_header_aborts() {
        let tmp = setup_project();
        write_file(tmp.path(), "static/routes", b"not a header");
        let config = config_for(tmp.path());

        match build(&config) {
            Err(PipelineError::Emit(EmitError::NamingCollision { kind, name, second, .. })) => {
                assert_eq!(kind, "file");
                assert_eq!(name, "ui_routes.h");
                assert_eq!(second, "routes");
            }
            other => panic!("expected file collision, got {other:?}"),
        }
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn extensionless_html_file_builds() {
        let tmp = setup_project();
        write_file(tmp.path(), "static/html", b"plain");
        let config = config_for(tmp.path());

        let output = build(&config).unwrap();
        let paths: Vec<&str> = output.emitted.routes.iter().map(|r| r.path.as_str()).collect();
        assert!(paths.contains(&"/ui/html"));
        assert!(paths.contains(&"/ui/"));
        assert!(!paths.contains(&"/ui/h"));
    }

    #[test]
    fn invalid_config_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_for(tmp.path());
        config.base_path = "/ui/".into();
        assert!(matches!(build(&config), Err(PipelineError::Config(_))));
    }

    #[test]
    fn empty_project_writes_routes_only() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(tmp.path());
        let output = build(&config).unwrap();

        assert_eq!(output.emitted.files.len(), 1);
        assert!(output.emitted.routes.is_empty());
        let routes = fs::read_to_string(config.output_dir.join("ui_routes.h")).unwrap();
        assert!(routes.contains(" * Total: 0 bytes"));
    }

    #[test]
    fn unwritable_output_reports_path() {
        let tmp = setup_project();
        let mut config = config_for(tmp.path());
        // A regular file where the output directory should be.
        write_file(tmp.path(), "blocked", b"");
        config.output_dir = tmp.path().join("blocked");

        match build(&config) {
            Err(PipelineError::Write { path, .. }) => assert_eq!(path, config.output_dir),
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
