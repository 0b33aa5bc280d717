#![forbid(unsafe_code)]

//! sasflow CLI - extract and render dataset dependency graphs from SAS
//! scripts.
//!
//! # Commands
//!
//! - `analyze`: run the pipeline and emit the JSON analysis report
//! - `render`: run the pipeline and emit the Mermaid flowchart text
//!
//! This binary is the "external collaborator" of the core: all file I/O
//! lives here, the pipeline crates are pure in-memory transformations.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sf_core::{ScriptReport, runs_to_json_pretty};
use sf_graph::analyze_script;
use sf_render_mermaid::{render_flowchart, sanitize_runs};
use tracing::{debug, info};

/// sasflow CLI - extract and render dataset dependency graphs from SAS scripts.
#[derive(Debug, Parser)]
#[command(
    name = "sf-cli",
    version,
    about = "Extract dataset dependency graphs from SAS scripts",
    long_about = "Splits a SAS batch script into runs, extracts per-run input/output\n\
        dataset references, groups datasets into weakly-connected subgraphs, and\n\
        renders the result as a Mermaid flowchart or a JSON analysis report."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a SAS script and emit the JSON analysis report.
    Analyze {
        /// Input file path or "-" for stdin. If omitted, reads from stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,

        /// Emit only the run-record array (the downstream diagram
        /// interchange format) instead of the full report.
        #[arg(long)]
        runs_only: bool,

        /// Keep run code as extracted instead of sanitizing it for diagram
        /// labels.
        #[arg(long)]
        raw_code: bool,
    },

    /// Render a SAS script as a Mermaid flowchart.
    Render {
        /// Input file path or "-" for stdin. If omitted, reads from stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Analyze {
            input,
            output,
            runs_only,
            raw_code,
        } => cmd_analyze(&input, output.as_deref(), runs_only, raw_code),

        Command::Render { input, output } => cmd_render(&input, output.as_deref()),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .try_init();
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline script text
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn cmd_analyze(input: &str, output: Option<&str>, runs_only: bool, raw_code: bool) -> Result<()> {
    let source = load_input(input)?;
    let ScriptReport { runs, summary } = analyze_script(&source);

    debug!(
        runs = runs.len(),
        subgraphs = summary.subgraphs.len(),
        edges = summary.edges.len(),
        "analyzed script"
    );

    info!(
        "Analyzed {} runs across {} subgraphs",
        runs.len(),
        summary.subgraphs.len()
    );

    let runs = if raw_code { runs } else { sanitize_runs(runs) };

    let json = if runs_only {
        runs_to_json_pretty(&runs).context("Failed to encode run records")?
    } else {
        ScriptReport { runs, summary }
            .to_json_pretty()
            .context("Failed to encode analysis report")?
    };

    write_output(output, &json)
}

fn cmd_render(input: &str, output: Option<&str>) -> Result<()> {
    let source = load_input(input)?;
    let ScriptReport { runs, summary } = analyze_script(&source);

    debug!(
        runs = runs.len(),
        subgraphs = summary.subgraphs.len(),
        "analyzed script"
    );

    let runs = sanitize_runs(runs);
    let diagram = render_flowchart(&runs);

    write_output(output, &diagram)?;

    info!(
        "Rendered {} runs, {} dataset edges",
        runs.len(),
        summary.edges.len()
    );
    Ok(())
}
