//! sqlsense CLI - cursor-aware SQL completion

use sqlsense_cli::catalog::{self, Catalog};
use sqlsense_cli::cli;
use sqlsense_cli::input;
use sqlsense_cli::output;

use anyhow::{Context, Result};
use clap::Parser;
use sqlsense_core::{completion_context, try_complete, CompletionOptions, CompletionRequest};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Args, OutputFormat};

/// Invalid request (e.g. cursor outside the query).
const EXIT_FAILURE: u8 = 1;
/// Configuration error (unreadable input or catalog).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.quiet);

    if args.request_schema {
        return match print_request_schema(args.compact) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("sqlsense: error: {e:#}");
                ExitCode::from(EXIT_FAILURE)
            }
        };
    }

    let request = match build_request(&args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("sqlsense: error: {e:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match run(&args, &request) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sqlsense: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG`.
fn init_logging(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_request_schema(compact: bool) -> Result<()> {
    let schema = schemars::schema_for!(CompletionRequest);
    let json = output::format_json(&schema, compact).context("Failed to serialize schema")?;
    write_output(&json)
}

/// Assemble the completion request from the query source and catalog file.
fn build_request(args: &Args) -> Result<CompletionRequest> {
    let query = input::read_query(args.query.as_deref(), args.file.as_deref())?;
    let (query, cursor_offset) = input::place_cursor(query, args.cursor, &args.marker)?;

    let Catalog { tables, schemas } = match &args.catalog {
        Some(path) => catalog::load_catalog(path)?,
        None => Catalog::default(),
    };
    debug!(
        tables = tables.len(),
        cursor = cursor_offset,
        "completion request assembled"
    );

    if !args.no_structured {
        let status = sqlsense_core::init_structured_parser();
        debug!(?status, "structured parser initialized");
    }

    Ok(CompletionRequest {
        query,
        cursor_offset,
        catalog_tables: tables,
        schema_names: schemas,
        options: CompletionOptions {
            max_results: args.max_results,
            dialect: args.dialect.into(),
            structured_parse: !args.no_structured,
            ..CompletionOptions::default()
        },
    })
}

fn run(args: &Args, request: &CompletionRequest) -> Result<()> {
    let rendered = if args.context {
        request.validate()?;
        let ctx = completion_context(request);
        match args.format {
            OutputFormat::Json => {
                output::format_json(&ctx, args.compact).context("Failed to serialize context")?
            }
            OutputFormat::Table => output::format_context(&ctx, true),
        }
    } else {
        let suggestions = try_complete(request)?;
        match args.format {
            OutputFormat::Json => output::format_json(&suggestions, args.compact)
                .context("Failed to serialize suggestions")?,
            OutputFormat::Table => output::format_table(&suggestions, true),
        }
    };

    write_output(&rendered)
}

fn write_output(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        writeln!(stdout).context("Failed to write to stdout")?;
    }
    Ok(())
}
