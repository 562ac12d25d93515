use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;

use voxgen::{
    BatchScheduler, DEFAULT_CONCURRENCY, PollyTts, RunConfig, WavWriter, parse_records,
};

/// voxgen - Batch voice-line generator for Amazon Polly
#[derive(Parser, Debug)]
#[command(name = "voxgen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the CSV script (filename,text per line)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        default_value = "custom.csv"
    )]
    input: PathBuf,

    /// Destination directory for generated WAV files (must not exist)
    #[arg(
        short = 'd',
        long = "dest",
        value_name = "DIR",
        default_value = "custom"
    )]
    dest: PathBuf,

    /// Maximum number of records synthesized concurrently
    #[arg(
        short = 'j',
        long = "concurrency",
        value_name = "N",
        default_value_t = DEFAULT_CONCURRENCY
    )]
    concurrency: usize,

    /// Polly engine (standard, neural, long-form, generative)
    #[arg(long = "engine", value_name = "ENGINE", default_value = "standard")]
    engine: String,

    /// Polly language code
    #[arg(long = "language", value_name = "CODE", default_value = "en-US")]
    language: String,

    /// Polly voice id
    #[arg(long = "voice", value_name = "VOICE", default_value = "Matthew")]
    voice: String,

    /// PCM sample rate in Hz (8000 or 16000)
    #[arg(long = "sample-rate", value_name = "HZ", default_value_t = 16000)]
    sample_rate: u32,

    /// AWS region override (defaults to the AWS region chain)
    #[arg(long = "region", value_name = "REGION")]
    region: Option<String>,

    /// Keep generating remaining records after a failure
    #[arg(long = "keep-going")]
    keep_going: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before the AWS config loads)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = RunConfig {
        input: cli.input,
        dest: cli.dest,
        concurrency: cli.concurrency,
        keep_going: cli.keep_going,
        engine: cli.engine,
        language: cli.language,
        voice: cli.voice,
        sample_rate: cli.sample_rate,
        region: cli.region,
    };
    config.validate()?;

    // Read and parse the whole script before any synthesis starts
    let script = std::fs::read_to_string(&config.input)
        .map_err(|e| anyhow!("Failed to read script {}: {}", config.input.display(), e))?;
    let records = parse_records(&script)
        .map_err(|e| anyhow!("Failed to parse script {}: {}", config.input.display(), e))?;
    println!(
        "Parsed {} records from {}",
        records.len(),
        config.input.display()
    );

    config.prepare_destination()?;

    // One Polly client and one WAV writer, shared by every task
    let client = PollyTts::connect(config.voice_settings()).await;
    let scheduler = BatchScheduler::new(
        Arc::new(client),
        Arc::new(WavWriter),
        config.dest.clone(),
        config.audio_format(),
    )
    .with_concurrency(config.concurrency)
    .with_failure_policy(config.failure_policy());

    println!("Generating and downloading sounds from AWS Polly. Please wait...");
    let outcome = scheduler.run(records).await;

    println!(
        "Batch finished: {} succeeded, {} failed, {} cancelled (of {})",
        outcome.succeeded, outcome.failed, outcome.cancelled, outcome.total
    );

    if !outcome.is_success() {
        for failure in &outcome.failures {
            eprintln!("error: {failure}");
        }
        return Err(anyhow!(
            "{} of {} records did not produce output",
            outcome.failed + outcome.cancelled,
            outcome.total
        ));
    }

    println!("Application completed the task. Bye!");
    Ok(())
}
