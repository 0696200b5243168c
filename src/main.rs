use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paintswap::models::{parse_instructions, AppConfig, ConfigSource, InstructionPayload};
use paintswap::rendering::OutputFormat;
use paintswap::services::{SwapPipeline, SwapPool, SwapRequest};

#[derive(Parser)]
#[command(name = "paintswap")]
#[command(about = "Paintswap - replace colors in PNG and JPEG images")]
struct Cli {
    /// Config file (overrides CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Swap colors in a single image
    Swap {
        /// Input PNG or JPEG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Instruction as SOURCE:TARGET[:TOLERANCE[:FEATHER[:OPACITY]]], e.g. "#ff0000:#0000ff:10:2"
        #[arg(short, long = "swap", value_name = "SPEC")]
        swaps: Vec<InstructionPayload>,

        /// JSON file with an array of instructions (applied after --swap)
        #[arg(long)]
        instructions: Option<PathBuf>,

        /// Output format: png or jpeg (default: same as input)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// Swap colors in many images concurrently
    Batch {
        /// JSON file with an array of instructions applied to every input
        #[arg(long)]
        instructions: PathBuf,

        /// Directory for the output files
        #[arg(long)]
        out_dir: PathBuf,

        /// Output format: png or jpeg (default: same as each input)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Input PNG or JPEG files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the effective configuration as YAML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Swap {
            input,
            output,
            swaps,
            instructions,
            format,
        }) => {
            init_logging("paintswap=warn");
            let (config, _) = AppConfig::load(config_path.as_deref());
            run_swap_command(&config, &input, &output, swaps, instructions, format)
        }
        Some(Commands::Batch {
            instructions,
            out_dir,
            format,
            inputs,
        }) => {
            init_logging("paintswap=info");
            let (config, _) = AppConfig::load(config_path.as_deref());
            run_batch_command(&config, &instructions, &out_dir, format, &inputs).await
        }
        Some(Commands::Config) => {
            init_logging("paintswap=warn");
            let (config, source) = AppConfig::load(config_path.as_deref());
            println!("# source: {source}");
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        None => {
            init_logging("paintswap=warn");
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn read_instructions(path: &Path) -> anyhow::Result<Vec<InstructionPayload>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read instructions from {}", path.display()))?;
    parse_instructions(&json)
        .with_context(|| format!("Failed to parse instructions in {}", path.display()))
}

/// Apply instructions to one image (no worker pool needed)
fn run_swap_command(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    mut swaps: Vec<InstructionPayload>,
    instructions: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> anyhow::Result<()> {
    if let Some(path) = instructions {
        swaps.extend(read_instructions(&path)?);
    }

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let format = format.or_else(|| format_from_extension(output));

    let pipeline = SwapPipeline::new(config)?;
    let mut request = SwapRequest::new(bytes, swaps);
    request.format = format;

    let result = pipeline
        .process(request)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    std::fs::write(output, &result.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({}x{} {}, {} bytes, {} ms)",
        output.display(),
        result.width,
        result.height,
        result.format,
        result.bytes.len(),
        result.elapsed.as_millis()
    );
    Ok(())
}

/// Run every input through the worker pool, at most `max_concurrent` at a time
async fn run_batch_command(
    config: &AppConfig,
    instructions: &Path,
    out_dir: &Path,
    format: Option<OutputFormat>,
    inputs: &[PathBuf],
) -> anyhow::Result<()> {
    let instructions = read_instructions(instructions)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let pool = SwapPool::from_config(config)?;
    tracing::info!(
        files = inputs.len(),
        workers = pool.max_concurrent(),
        "Starting batch"
    );

    let mut failed = 0usize;
    for chunk in inputs.chunks(pool.max_concurrent()) {
        let mut handles = Vec::with_capacity(chunk.len());
        for input in chunk {
            let pool = pool.clone();
            let request = match std::fs::read(input) {
                Ok(bytes) => {
                    let mut request = SwapRequest::new(bytes, instructions.clone());
                    request.format = format;
                    request
                }
                Err(e) => {
                    println!("FAIL {}: {e}", input.display());
                    failed += 1;
                    continue;
                }
            };
            let handle = tokio::spawn(async move { pool.submit(request).await });
            handles.push((input, handle));
        }

        for (input, handle) in handles {
            match handle.await {
                Ok(Ok(result)) => {
                    let stem = input
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("output");
                    let output = out_dir.join(format!("{stem}.{}", result.format.extension()));
                    match std::fs::write(&output, &result.bytes) {
                        Ok(()) => println!(
                            "OK   {} -> {} ({} ms)",
                            input.display(),
                            output.display(),
                            result.elapsed.as_millis()
                        ),
                        Err(e) => {
                            println!("FAIL {}: {e}", output.display());
                            failed += 1;
                        }
                    }
                }
                Ok(Err(e)) => {
                    println!("FAIL {}: {e}", input.display());
                    failed += 1;
                }
                Err(e) => {
                    println!("FAIL {}: worker panicked: {e}", input.display());
                    failed += 1;
                }
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", inputs.len());
    }
    Ok(())
}

fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}

/// Display status information (no subcommand)
fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let (config, source) = AppConfig::load(config_path);
    let limits = &config.limits;

    println!("Paintswap v{VERSION}");
    println!("Replace colors in PNG and JPEG images\n");

    println!("Configuration:");
    match &source {
        ConfigSource::Embedded => println!("  source      = embedded config.yaml"),
        ConfigSource::File(path) => println!("  source      = {}", path.display()),
        ConfigSource::Defaults => println!("  source      = built-in defaults (config file unusable)"),
    }

    println!("\nLimits:");
    println!(
        "  max size    = {}x{}",
        limits.max_width, limits.max_height
    );
    println!("  max input   = {} bytes", limits.max_input_bytes);
    println!("  max steps   = {}", limits.max_instructions);
    println!("  max feather = {} px", limits.max_feather_radius);
    println!("  workers     = {}", limits.concurrency());
    println!("  timeout     = {} ms", limits.request_timeout_ms);

    println!("\nRun 'paintswap --help' for available commands.");
}
