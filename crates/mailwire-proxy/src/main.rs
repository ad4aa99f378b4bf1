//! `mailwire-proxy` - pass-through IMAP proxy.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::net::SocketAddr;

use clap::Parser;
use mailwire_imap::DecoderConfig;
use mailwire_imap::config::DEFAULT_MAX_LITERAL_LEN;
use mailwire_proxy::ProxyConfig;
use mailwire_proxy::config::{DEFAULT_LISTEN, DEFAULT_UPSTREAM_HOST, DEFAULT_UPSTREAM_PORT};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mailwire-proxy", version)]
#[command(about = "Pass-through IMAP proxy that validates traffic in both directions")]
struct Args {
    /// Address to accept client connections on
    #[arg(long, default_value_t = DEFAULT_LISTEN)]
    listen: SocketAddr,

    /// Upstream IMAP server host
    #[arg(long, default_value = DEFAULT_UPSTREAM_HOST)]
    upstream_host: String,

    /// Upstream IMAP server port
    #[arg(long, default_value_t = DEFAULT_UPSTREAM_PORT)]
    upstream_port: u16,

    /// Largest literal accepted from either side, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LITERAL_LEN)]
    max_literal_len: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailwire_proxy=info,mailwire_imap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = ProxyConfig::builder()
        .listen(args.listen)
        .upstream_host(args.upstream_host)
        .upstream_port(args.upstream_port)
        .decoder(
            DecoderConfig::builder()
                .max_literal_len(args.max_literal_len)
                .build(),
        )
        .build();

    tokio::select! {
        result = mailwire_proxy::serve(config) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }

    Ok(())
}
