//! Terminal front end for the translator
//!
//! # Configuration
//!
//! Settings come from `settings.json` in the platform config directory
//! (created with defaults on first run), or from `--config`. The backend URL
//! can be overridden with `TRANSLATOR_API_URL` or `--api-url`.
//!
//! # Logging
//!
//! Logs go to stderr. `RUST_LOG` takes precedence; otherwise `--verbose`
//! switches from `info` to `debug`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::error;
use tracing_subscriber::EnvFilter;

use translator_orchestrator::core::clipboard::SystemClipboard;
use translator_orchestrator::core::features::translator::orchestrator::Draft;
use translator_orchestrator::core::features::translator::{
    FileSelection, Orchestrator, OrchestratorState, SubmitOutcome,
};
use translator_orchestrator::shared::error::AppResult;
use translator_orchestrator::shared::settings::AppSettings;
use translator_orchestrator::TranslatorApp;

/// English to Kannada translator
#[derive(Parser, Debug)]
#[command(name = "translator")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides settings
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate text; reads stdin when TEXT is omitted
    Text {
        text: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Translate a .txt, .pdf, .doc or .docx file (max 10MB)
    File {
        path: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the effective settings and where they are read from
    Config,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Copy the translation to the clipboard
    #[arg(long)]
    copy: bool,

    /// Save the translation as a .txt file (into DIR, the configured export
    /// directory, or the current directory)
    #[arg(long, value_name = "DIR")]
    export: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> AppResult<ExitCode> {
    let mut settings = match &args.config {
        Some(path) => AppSettings::load_from(path).await?,
        None => AppSettings::load().await?,
    };
    if let Some(url) = args.api_url {
        settings.api.base_url = url;
    }

    match args.command {
        Command::Config => {
            let settings_path = match args.config {
                Some(path) => path,
                None => AppSettings::get_settings_path()?,
            };
            println!("# {}", settings_path.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Text { text, output } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    tokio::io::stdin().read_to_string(&mut buf).await?;
                    buf
                }
            };

            let app = TranslatorApp::new(settings)?;
            app.text.set_text(text);
            let outcome = app.text.submit().await;
            report(&app.text, outcome, &output, &app.settings).await
        }
        Command::File { path, output } => {
            let selection = FileSelection::from_path(&path).await?;
            let app = TranslatorApp::new(settings)?;
            if let Err(err) = app.file.select_file(selection) {
                eprintln!("{}", err);
                return Ok(ExitCode::from(2));
            }
            let outcome = app.file.submit().await;
            report(&app.file, outcome, &output, &app.settings).await
        }
    }
}

async fn report<D: Draft>(
    orchestrator: &Orchestrator<D>,
    outcome: SubmitOutcome,
    output: &OutputArgs,
    settings: &AppSettings,
) -> AppResult<ExitCode> {
    match outcome {
        SubmitOutcome::Completed(OrchestratorState::Succeeded(_)) => {}
        SubmitOutcome::Rejected(err) => {
            eprintln!("{}", err);
            return Ok(ExitCode::from(2));
        }
        _ => {
            let message = orchestrator
                .error_message()
                .unwrap_or_else(|| orchestrator.kind().transport_fallback().to_string());
            eprintln!("{}", message);
            return Ok(ExitCode::FAILURE);
        }
    }

    let presenter = orchestrator
        .presenter()
        .ok_or("Translation result unavailable")?;

    if let Some(name) = &presenter.result().source_file_name {
        eprintln!("Translated content from {}", name);
    }
    println!("{}", presenter.translated_text());

    if output.copy {
        eprintln!("{}", presenter.copy_to_clipboard(&SystemClipboard).message());
    }

    if let Some(dir) = &output.export {
        let dir = dir
            .clone()
            .or_else(|| settings.preferences.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let path = presenter.export_as_file().write_to(&dir).await?;
        eprintln!("Saved {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
