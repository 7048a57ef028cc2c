use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finplan::api::run_http_server;
use finplan::client::HttpBackend;

#[derive(Debug, Parser)]
#[command(name = "finplan", about = "Personal finance planning gateway")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP gateway.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Base URL of the planning backend.
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        backend_url: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port, backend_url } => {
            let backend = Arc::new(HttpBackend::new(&backend_url));
            if let Err(e) = run_http_server(port, backend).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
    }
}
