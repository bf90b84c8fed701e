use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio::config;
use folio::cover::BitmapCoverRenderer;
use folio::epub::EpubWriter;
use folio::pipeline::extraction::{load_prompt_template, GeminiClient};
use folio::pipeline::BookPress;

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Press a plain-text manuscript into a covered EPUB with AI-detected structure"
)]
struct Cli {
    /// Input UTF-8 manuscript, paragraphs separated by blank lines
    input: PathBuf,

    /// Directory for the finished book (and the temporary cover)
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Gemini model used for structure extraction
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Extraction request timeout in seconds
    #[arg(long, default_value_t = config::EXTRACTION_TIMEOUT_SECS)]
    timeout: u64,
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FOLIO_LOG")
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var(config::API_KEY_VAR)
        .map_err(|_| format!("missing {} environment variable", config::API_KEY_VAR))?;

    let prompt_template = load_prompt_template(&config::prompt_path())?;

    let press = BookPress::new(
        Box::new(GeminiClient::public(&cli.model, &api_key, cli.timeout)),
        Box::new(BitmapCoverRenderer::default()),
        Box::new(EpubWriter),
        prompt_template,
    );

    let out_path = press.press(&cli.input, &cli.out_dir)?;
    println!("{}", out_path.display());
    Ok(())
}
