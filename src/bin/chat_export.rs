//! Export a saved AI chat page to Markdown and/or HTML files.
//!
//! Reads the page from a file (or stdin), writes the requested formats into
//! the output directory, and prints the export response as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use ai_chat_export::export::{export_current, ExportRequest, ExportResponse, FileSink, Formats};
use ai_chat_export::{encoding, Error, Options, Platform, SelectorProfile};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Export a saved ChatGPT or Claude conversation.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Saved page. Reads stdin when omitted or `-`.
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Address the page was saved from (used for platform detection).
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Force the platform instead of detecting it (chatgpt, claude).
    #[arg(long, value_name = "NAME")]
    platform: Option<Platform>,

    /// Write a Markdown file. Default when no format flag is given.
    #[arg(long)]
    markdown: bool,

    /// Write an HTML file.
    #[arg(long)]
    html: bool,

    /// Directory the files are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Replace existing files.
    #[arg(short, long)]
    force: bool,

    /// Selector profile (JSON) replacing the built-in one.
    #[arg(long, value_name = "PATH")]
    selectors: Option<PathBuf>,

    /// Log extraction details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "ai_chat_export=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_input(input: Option<&PathBuf>) -> Result<Vec<u8>, Error> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            tokio::fs::read(path).await.map_err(|err| Error::io(path, err))
        }
        _ => {
            let mut bytes = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut bytes)
                .await
                .map_err(|err| Error::io("<stdin>", err))?;
            Ok(bytes)
        }
    }
}

async fn load_profile(path: Option<&PathBuf>) -> Result<Option<SelectorProfile>, Error> {
    let Some(path) = path else {
        return Ok(None);
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| Error::io(path, err))?;
    SelectorProfile::from_json(&json).map(Some)
}

async fn run(cli: Cli) -> ExportResponse {
    let setup = async {
        let bytes = read_input(cli.input.as_ref()).await?;
        let profile = load_profile(cli.selectors.as_ref()).await?;
        Ok::<_, Error>((bytes, profile))
    };
    let (bytes, profile) = match setup.await {
        Ok(loaded) => loaded,
        Err(error) => {
            return ExportResponse {
                success: false,
                error: Some(error.to_string()),
                ..ExportResponse::default()
            }
        }
    };

    let html = encoding::transcode_to_utf8(&bytes);
    debug!(bytes = bytes.len(), "read input");

    let options = Options {
        url: cli.url,
        platform: cli.platform,
        profile,
        ..Options::default()
    };
    let request = ExportRequest {
        formats: Formats {
            markdown: cli.markdown || !cli.html,
            html: cli.html,
        },
    };
    let sink = FileSink::new(cli.out_dir).overwrite(cli.force);

    export_current(&html, &request, &options, &sink).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let response = run(cli).await;
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("cannot serialize response: {err}"),
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
