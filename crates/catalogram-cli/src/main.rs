mod logging;
mod settings;
mod snapshot;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use catalogram_core::{CatalogView, Error as CoreError};
use catalogram_render::{DiagramFormat, RenderError, render};
use clap::{Args, Parser, Subcommand};
use logging::init_logging;
use settings::{RenderSettings, load_settings, resolve_render};
use snapshot::{catalog_json_schema, load_catalog};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("catalog error: {0}")]
    Core(#[from] CoreError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("catalog snapshot does not match its schema:\n{}", .0.join("\n"))]
    SnapshotSchema(Vec<String>),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "catalogram", version, about = "Render database catalogs as diagrams")]
struct Cli {
    /// Append JSON log lines to this file instead of stderr.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a catalog snapshot in one notation.
    Render(RenderArgs),
    /// Check a catalog snapshot for structural and reference errors.
    Validate(ValidateArgs),
    /// Print the JSON Schema of catalog snapshot files.
    Schema,
    /// List output formats and the quoting rules they accept.
    Formats,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Catalog snapshot (JSON).
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,
    /// Output notation: mermaid, dbml, markdown or plantuml.
    #[arg(long)]
    format: Option<String>,
    /// Document title or project name.
    #[arg(long)]
    title: Option<String>,
    /// Identifier quoting: none or quote-all.
    #[arg(long)]
    quoting: Option<String>,
    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Config file (defaults to ./catalogram.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leave table and column remarks out.
    #[arg(long)]
    no_remarks: bool,
    /// Hide foreign key names.
    #[arg(long)]
    no_foreign_key_names: bool,
    /// Hide index names.
    #[arg(long)]
    no_index_names: bool,
    /// Hide primary key names.
    #[arg(long)]
    no_primary_key_names: bool,
    /// Hide all key and index names.
    #[arg(long)]
    portable_names: bool,
    /// Number columns by their position in the table.
    #[arg(long)]
    show_ordinal_numbers: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Catalog snapshot (JSON).
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Validate(args) => run_validate(args),
        Command::Schema => run_schema(),
        Command::Formats => run_formats(),
    }
}

fn run_render(args: RenderArgs) -> Result<(), CliError> {
    let RenderArgs {
        catalog,
        format,
        title,
        quoting,
        out,
        config,
        no_remarks,
        no_foreign_key_names,
        no_index_names,
        no_primary_key_names,
        portable_names,
        show_ordinal_numbers,
    } = args;

    let settings = load_settings(config.as_deref())?;
    let resolved = resolve_render(
        &settings,
        RenderSettings {
            format,
            title,
            quoting,
            output: out,
            no_remarks: no_remarks.then_some(true),
            no_foreign_key_names: no_foreign_key_names.then_some(true),
            no_index_names: no_index_names.then_some(true),
            no_primary_key_names: no_primary_key_names.then_some(true),
            portable_names: portable_names.then_some(true),
            show_ordinal_numbers: show_ordinal_numbers.then_some(true),
        },
    )?;

    let catalog = load_catalog(&catalog)?;
    let view = CatalogView::new(&catalog)?;

    let summary = match &resolved.output {
        Some(path) => {
            let file = File::create(path)?;
            render(resolved.format, &view, &resolved.options, BufWriter::new(file))?
        }
        None => {
            let stdout = io::stdout();
            render(
                resolved.format,
                &view,
                &resolved.options,
                BufWriter::new(stdout.lock()),
            )?
        }
    };

    tracing::info!(
        event = "render_written",
        format = %summary.format,
        tables = summary.tables,
        bytes = summary.bytes_written,
        path = %resolved
            .output
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "-".to_string()),
    );

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let catalog = load_catalog(&args.catalog)?;
    let view = CatalogView::new(&catalog)?;

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "ok: {} schemas, {} tables, {} foreign keys",
        view.schemas().len(),
        view.tables().len(),
        view.foreign_key_count()
    )?;
    Ok(())
}

fn run_schema() -> Result<(), CliError> {
    let schema = catalog_json_schema()?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&schema)?)?;
    Ok(())
}

fn run_formats() -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    for format in DiagramFormat::ALL {
        let quoting: Vec<&str> = format
            .supported_quoting()
            .iter()
            .map(|rule| rule.as_str())
            .collect();
        writeln!(stdout, "{:<10} quoting: {}", format, quoting.join(", "))?;
    }
    Ok(())
}
