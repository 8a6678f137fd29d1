//! `pyxc`: compiles `.pyx` markup sources into sibling `.py` modules.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use pyx_compiler::{load_options, CompileOptions, Driver, DriverError};

/// Markup-in-Python compiler
#[derive(Debug, Parser)]
#[command(name = "pyxc")]
#[command(about = "Compile .pyx markup sources into Python modules", long_about = None)]
#[command(version)]
struct Cli {
    /// Source file or directory to scan recursively
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// JSON file with compile options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Accept closing tags that do not match their opening tag
    #[arg(long)]
    no_check_closing_tags: bool,

    /// Directory for the incremental compile cache
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Print the compiled module instead of writing it (single file only)
    #[arg(long, conflicts_with = "emit_ir")]
    stdout: bool,

    /// Print the IR of each markup occurrence as JSON (single file only)
    #[arg(long)]
    emit_ir: bool,

    /// Worker threads for directory builds
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Verbosity level (can be repeated for more output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn options_from(cli: &Cli) -> Result<CompileOptions, DriverError> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => CompileOptions::default(),
    };
    if cli.no_check_closing_tags {
        options.check_closing_tags = false;
    }
    if let Some(dir) = &cli.cache_dir {
        options.cache_dir = Some(dir.clone());
    }
    Ok(options)
}

fn run(cli: &Cli) -> Result<bool, DriverError> {
    let driver = Driver::new(options_from(cli)?)?;
    let mut stdout = std::io::stdout().lock();
    let io_error = |source| DriverError::Io {
        path: cli.path.clone(),
        source,
    };

    if cli.emit_ir {
        let source = std::fs::read_to_string(&cli.path).map_err(io_error)?;
        let file = cli.path.to_string_lossy();
        let ir = driver.compiler().occurrences(&source, &file)?;
        let json = serde_json::to_string_pretty(&ir).map_err(|source| DriverError::Json {
            path: cli.path.clone(),
            source,
        })?;
        writeln!(stdout, "{}", json).map_err(io_error)?;
        return Ok(true);
    }

    if cli.stdout {
        let output = driver.compile_file(&cli.path)?;
        stdout.write_all(output.as_bytes()).map_err(io_error)?;
        return Ok(true);
    }

    let summary = driver.build_path(&cli.path)?;
    eprintln!(
        "pyxc: {} compiled, {} failed",
        summary.compiled.len(),
        summary.failed.len()
    );
    Ok(summary.is_success())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    if let Some(jobs) = cli.jobs {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
        {
            error!("failed to configure {} worker threads: {}", jobs, e);
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
