//! Diagnostic CLI: run one capture through the extraction pipeline and
//! print the result as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{SecondsFormat, Utc};
use clap::Parser;

use ledgerlens::{init_tracing, ExpenseParser, GeminiClient, Modality, ParseRequest};

#[derive(Parser, Debug)]
#[command(name = "ledgerlens", about = "Extract a structured expense from a receipt image or voice note", version)]
struct Cli {
    /// Media file to parse.
    file: PathBuf,

    /// Capture modality: "image" or "audio".
    #[arg(long, default_value = "image")]
    modality: String,

    /// MIME type of the media file.
    #[arg(long, default_value = "image/jpeg")]
    mime_type: String,

    /// IANA timezone passed to the model.
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Reference timestamp (ISO-8601); defaults to the current time.
    #[arg(long)]
    now: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let modality = match cli.modality.as_str() {
        "image" => Modality::Image,
        "audio" => Modality::Audio,
        other => {
            eprintln!("unknown modality {other:?}, expected \"image\" or \"audio\"");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, modality) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("processing failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, modality: Modality) -> Result<String, Box<dyn std::error::Error>> {
    let media = std::fs::read(&cli.file)?;
    let now = cli
        .now
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let model = GeminiClient::from_env()?;
    let parser = ExpenseParser::new(Box::new(model));
    let result = parser.parse(&ParseRequest {
        media: &media,
        mime_type: &cli.mime_type,
        modality,
        now_iso: &now,
        timezone: &cli.timezone,
    })?;

    Ok(serde_json::to_string_pretty(&result)?)
}
