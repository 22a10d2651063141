//! trueno-transect - split a rectangle into evenly spaced transect lines.
//!
//! Reads one rectangle from a polygon layer of a GeoJSON workspace, writes
//! `LINE_COUNT + 1` transects to a new line layer and adds that layer to the
//! active map of the project, if one is configured.
//!
//! Run: `trueno-transect plots 3 plot3_lines 10 horizontal --workspace ./data`

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use trueno_transect::config::Config;
use trueno_transect::project::{add_to_map, ProjectFile};
use trueno_transect::store::GeoJsonWorkspace;
use trueno_transect::tool::{create_spaced_lines, SplitOptions, SplitRequest};

/// Split a rectangle into evenly spaced transect lines
#[derive(Parser, Debug)]
#[command(name = "trueno-transect")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Evenly spaced transects across a rectangular polygon", long_about = None)]
struct Cli {
    /// Polygon layer holding the rectangle
    rectangle_layer: String,

    /// OBJECTID of the rectangle
    #[arg(allow_negative_numbers = true)]
    rectangle_id: i64,

    /// Name of the line layer to create
    output_layer: String,

    /// Number of intervals (LINE_COUNT + 1 lines are written)
    #[arg(allow_negative_numbers = true)]
    line_count: i64,

    /// "horizontal" or "vertical"
    direction: String,

    /// Workspace directory with the GeoJSON layers
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Project file to register the output layer in
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail instead of replacing an existing output layer
    #[arg(long)]
    no_overwrite: bool,

    /// Reject rings that are not true rectangles
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layer CLI flags over the file/env configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(workspace) = &self.workspace {
            config.workspace = workspace.clone();
        }
        if let Some(project) = &self.project {
            config.project = Some(project.clone());
        }
        if self.no_overwrite {
            config.output.overwrite = false;
        }
        if self.strict {
            config.generation.strict = true;
        }
    }

    fn request(&self) -> SplitRequest {
        SplitRequest {
            rectangle_layer: self.rectangle_layer.clone(),
            rectangle_id: self.rectangle_id,
            output_layer: self.output_layer.clone(),
            line_count: self.line_count,
            direction: self.direction.clone(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::resolve(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);

    let mut workspace = GeoJsonWorkspace::new(&config.workspace);
    let options = SplitOptions {
        overwrite: config.output.overwrite,
        strict_tolerance: config.generation.strict.then_some(config.generation.tolerance),
    };

    let summary = create_spaced_lines(&mut workspace, &cli.request(), &options)?;
    println!(
        "Created {} with {} transects ({}).",
        summary.output_layer,
        summary.transects.len(),
        cli.direction
    );

    // Registration failures are reported on their own; the layer stays.
    let Some(project_path) = &config.project else {
        tracing::debug!("no project configured, skipping map registration");
        return Ok(());
    };
    let mut project = ProjectFile::load(project_path).with_context(|| {
        format!("{} was created but not added to a map", summary.output_layer)
    })?;
    let uri = add_to_map(&workspace, &mut project, &summary.output_layer)?;
    project
        .save(project_path)
        .with_context(|| format!("saving project {}", project_path.display()))?;
    println!("Added {uri} to map {}.", project.active_map.as_deref().unwrap_or_default());

    Ok(())
}
