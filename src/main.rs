use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_gateway::{
    api,
    config::{Cli, Transport},
    service, Gateway,
};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries protocol frames in stdio mode, so logs always go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let gateway = Gateway::from_config(&cli.upstream, &cli.agent)?;

    let outcome = match cli.transport {
        Transport::Http { port } => api::serve(gateway, port).await,
        Transport::Stdio => service::serve_stdio(gateway).await,
    };

    outcome.inspect_err(|e| tracing::error!("Server error: {:#}", e))
}
