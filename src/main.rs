use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use vice::config::{self, ConfigError, ViceConfig};
use vice::imaging::{
    self, ErrorKind, RenderMode, ResizeError, ResizeOptions, ResizeRequest, RustBackend,
};
use vice::storage::FileStore;
use vice::{logging, output};

fn version_string() -> &'static str {
    let on_tag = env!("VICE_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("VICE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "vice")]
#[command(about = "Resize an image in place")]
#[command(long_about = "\
Resize an image in place

The file is decoded, scaled to WIDTH x HEIGHT and overwritten with a PNG,
whatever its original format. With --ratio the image is fitted inside the
box instead, keeping its aspect ratio.

  vice photo.jpg 500 900        # exactly 500x900
  vice -r photo.jpg 500 900     # fits inside 500x900

Settings are read from ./vice.toml when present.
Run 'vice --gen-config' to print a documented vice.toml.

Exit codes:
  0  success
  2  invalid target size
  3  missing or undecodable image
  4  render failure
  5  encoding failure
  6  write-back failure
  7  configuration error")]
#[command(version = version_string())]
struct Cli {
    /// Image to resize; overwritten with the result
    #[arg(required_unless_present = "gen_config")]
    file: Option<PathBuf>,

    /// Target width in pixels
    #[arg(required_unless_present = "gen_config", allow_negative_numbers = true)]
    width: Option<i64>,

    /// Target height in pixels
    #[arg(required_unless_present = "gen_config", allow_negative_numbers = true)]
    height: Option<i64>,

    /// Keep the aspect ratio, fitting the image inside WIDTH x HEIGHT
    #[arg(short, long)]
    ratio: bool,

    /// Config file to use instead of ./vice.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Render on a worker thread
    #[arg(long)]
    offload: bool,

    /// Resize but do not write the result back
    #[arg(long)]
    dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Diagnostic level on stderr (RUST_LOG overrides)
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// Print a stock vice.toml with all options documented
    #[arg(long)]
    gen_config: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid log level '{level}': {reason}")]
    LogLevel { level: String, reason: String },
    #[error("Failed to print result: {0}")]
    Output(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(&'static str),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Resize(err) => match err.kind() {
                ErrorKind::InvalidSize => 2,
                ErrorKind::MissingImage => 3,
                ErrorKind::RenderFailure => 4,
                ErrorKind::EncodingFailure => 5,
                ErrorKind::PersistenceFailure => 6,
            },
            CliError::Config(_) | CliError::LogLevel { .. } => 7,
            CliError::Usage(_) => 2,
            CliError::Output(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    logging::init_tracing(&cli.log_level).map_err(|e| CliError::LogLevel {
        level: cli.log_level.clone(),
        reason: e.to_string(),
    })?;

    let (Some(file), Some(width), Some(height)) = (&cli.file, cli.width, cli.height) else {
        return Err(CliError::Usage("FILE, WIDTH and HEIGHT are required"));
    };

    let config = load_config(cli.config.as_deref())?;
    init_thread_pool(&config.processing);

    let request = ResizeRequest::for_path(file, width, height, cli.ratio)?;
    let mut options = ResizeOptions::from_config(&config);
    if cli.offload {
        options.render_mode = RenderMode::Offloaded;
    }
    let backend = RustBackend::from_config(&config);
    let store = FileStore::new();

    let outcome = if cli.dry_run {
        imaging::resize(&backend, &store, &request, &options)?
    } else {
        imaging::resize_in_place(&backend, &store, &request, &options)?
    };

    if cli.json {
        println!("{}", output::format_outcome_json(&outcome, file)?);
    } else {
        output::print_outcome(&outcome, file);
    }

    Ok(())
}

/// `--config` when given, otherwise `./vice.toml` if present, otherwise defaults.
fn load_config(explicit: Option<&Path>) -> Result<ViceConfig, ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
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
