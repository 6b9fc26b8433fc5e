//! Real-time presence and room-messaging server.
//!
//! Tracks online users, routes room and private chat events, and retains a
//! short bounded history per conversation.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! ```

use clap::Parser;

use chat_presence_rs::logger::setup_logger;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "server", about = "Real-time presence and room-messaging server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = chat_presence_rs::run_server(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
