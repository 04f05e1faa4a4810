//! Binary entry point for taskdeck.

use taskdeck::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr: the agent subcommand speaks JSON-RPC on stdout and the
    // protocol stream must stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::parse_async(None).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
