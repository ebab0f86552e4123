use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uipack::{config, output, pipeline};

/// Flags that override values from the config file.
#[derive(clap::Args)]
struct Overrides {
    /// Static assets directory
    #[arg(long, global = true)]
    static_dir: Option<PathBuf>,

    /// Web-UI build output directory
    #[arg(long, global = true)]
    build_dir: Option<PathBuf>,

    /// Directory for generated headers
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// URL prefix for registered routes (e.g. /ui)
    #[arg(long, global = true)]
    base_path: Option<String>,
}

#[derive(Parser)]
#[command(name = "uipack")]
#[command(about = "Embed a compiled web UI into firmware as C++ headers")]
#[command(long_about = "\
Embed a compiled web UI into firmware as C++ headers

Every asset becomes a gzip'd (or raw, when smaller) PROGMEM byte array with
an ESPAsyncWebServer handler. One routes header registers every handler.

Inputs:

  static/                          # Flat: every file, device-served
  build/
  ├── index.html                   # Top-level pages → /ui/
  ├── settings.html                #                 → /ui/settings(.html)
  └── .svelte-kit/output/
      ├── client/                  # Recursive, device-served
      └── server/                  # Recursive, headers only (no routes)

Outputs (src/ by default):

  ui_html.h, ui_svg.h, ...         # One header per directory + file kind
  ui_routes.h                      # setupRoutes(AsyncWebServer*)

Run 'uipack gen-config' to generate a documented uipack.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover and group assets without writing anything
    Scan,
    /// Run the full pipeline: scan → group → compress → emit
    Build,
    /// Print a stock uipack.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Scan => {
            let config = load(&cli)?;
            let plan = pipeline::plan(&config)?;
            output::print_scan_output(&plan.roots, &plan.groups);
        }
        Command::Build => {
            let config = load(&cli)?;
            init_thread_pool(&config.processing);
            let result = pipeline::build(&config)?;
            for line in output::format_roots(&result.roots) {
                println!("{}", line);
            }
            println!();
            output::print_report(&result.stats);
            output::print_written(&result.emitted.files, &config.output_dir);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides on top.
fn load(cli: &Cli) -> Result<config::PackConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    let overrides = &cli.overrides;
    if let Some(dir) = &overrides.static_dir {
        config.static_dir = dir.clone();
    }
    if let Some(dir) = &overrides.build_dir {
        config.build_dir = dir.clone();
    }
    if let Some(dir) = &overrides.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(base) = &overrides.base_path {
        config.base_path = base.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
