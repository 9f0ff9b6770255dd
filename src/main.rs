//! # contactpack console
//!
//! Runs the conversation engine for one local user over stdin/stdout.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use contactpack::cli::{self, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "contactpack=debug" } else { "contactpack=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(&args).await {
        eprintln!("❌ Error: {e}");
        process::exit(1);
    }
}
