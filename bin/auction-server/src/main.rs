use auction_server::{bind, ServerConfig};
use clap::Parser;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// A multi-user, in-memory, line-protocol auction server.
#[derive(Parser)]
#[clap(about = "Auction server")]
struct Cli {
    /// Port to listen on.
    #[clap(short, long, default_value_t = 10_000, value_parser = clap::value_parser!(u16).range(1..=65535))]
    port: u16,

    /// Raises the default tracing filter to `debug`.
    #[clap(long)]
    debug: bool,

    /// Flat fee withdrawn from the seller when an item is listed.
    #[clap(long, default_value_t = 1)]
    listing_fee: u64,

    /// Default auction duration in seconds when SELL omits one.
    #[clap(long, default_value_t = 300)]
    default_auction_secs: u64,

    /// Soft cap on concurrently active connections.
    #[clap(long, default_value_t = 100)]
    max_connections: usize,

    /// Directory for the rolling daily log file, in addition to stdout.
    #[clap(long, default_value = "logs")]
    log_dir: String,
}

fn init_tracing(cli: &Cli) -> tracing_appender::non_blocking::WorkerGuard {
    let default_level = if cli.debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let file_appender = tracing_appender::rolling::daily(&cli.log_dir, "auction-server.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stdout.and(non_blocking))
        .init();

    guard
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli);

    let server = bind(ServerConfig {
        port: cli.port,
        listing_fee: cli.listing_fee,
        default_auction_secs: cli.default_auction_secs,
        max_connections: cli.max_connections,
    })
    .await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    tokio::select! {
        _ = server.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
