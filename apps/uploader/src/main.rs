use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use uploader::intake::check;
use uploader::{
    CandidateFile, Config, HttpTransport, SelectionOrigin, SelectionOutcome, UploadController,
    UploadOutcome,
};

/// Validate and upload a résumé to the configured upload service
#[derive(Parser, Debug)]
#[command(name = "uploader")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a file against the upload policy without sending it
    Check { path: PathBuf },
    /// Validate a file and upload it
    Upload { path: PathBuf },
    /// Show the processing status of an uploaded file
    Status { file_id: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Configuration first: a malformed policy is fatal. The endpoint is only
    // required once a transport is built, so `check` works offline.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting uploader v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Check { path } => run_check(&config, path).await,
        Command::Upload { path } => run_upload(&config, path).await,
        Command::Status { file_id } => run_status(&config, &file_id).await,
    }
}

async fn run_check(config: &Config, path: PathBuf) -> Result<ExitCode> {
    let file = CandidateFile::from_path(&path).await?;
    match check(&file, &config.policy).reason() {
        None => {
            println!("{} ({} MB) can be uploaded", file.name(), file.size_mb());
            Ok(ExitCode::SUCCESS)
        }
        Some(reason) => {
            eprintln!("{reason}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_upload(config: &Config, path: PathBuf) -> Result<ExitCode> {
    let transport = Arc::new(HttpTransport::from_config(config)?);
    let controller = UploadController::new(config.policy.clone(), transport);

    let file = CandidateFile::from_path(&path).await?;
    let selection = controller.on_files_proposed(SelectionOrigin::Picker, [file]);
    if !matches!(selection, SelectionOutcome::Accepted) {
        if let Some(message) = selection.message() {
            eprintln!("{message}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let view = controller.view();
    println!(
        "Uploading {} ({} MB)...",
        view.file_name.unwrap_or_default(),
        view.file_size_mb.unwrap_or_default()
    );

    let outcome = controller.submit().await?;
    Ok(report(&outcome))
}

async fn run_status(config: &Config, file_id: &str) -> Result<ExitCode> {
    let transport = HttpTransport::from_config(config)?;
    let outcome = UploadOutcome::from_send_result(transport.fetch_status(file_id).await);
    Ok(report(&outcome))
}

fn report(outcome: &UploadOutcome) -> ExitCode {
    match outcome {
        UploadOutcome::Success {
            message,
            server_file_id,
            extracted_data,
        } => {
            println!("{message}");
            if let Some(id) = server_file_id {
                println!("File id: {id}");
            }
            if let Some(data) = extracted_data {
                match serde_json::to_string_pretty(data) {
                    Ok(pretty) => println!("{pretty}"),
                    Err(_) => println!("{data}"),
                }
            }
            ExitCode::SUCCESS
        }
        UploadOutcome::Failure { kind, detail } => {
            eprintln!("[{}] {detail}", kind.code());
            ExitCode::FAILURE
        }
    }
}
