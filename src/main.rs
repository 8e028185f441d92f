use conformance_runner::cli;
use std::process::ExitCode;

/// Exit status for harness errors (bad configuration, unwritable report).
const HARNESS_ERROR_EXIT: u8 = 255;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    match cli::run().await {
        // The high-severity count; 255 is reserved for harness errors.
        Ok(count) => ExitCode::from(count.min(254) as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(HARNESS_ERROR_EXIT)
        }
    }
}
