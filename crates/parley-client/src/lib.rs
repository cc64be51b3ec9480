pub mod activity;
pub mod app;
pub mod channel;
pub mod commands;
pub mod config;
pub mod display;
pub mod events;
pub mod session;
pub mod state;
pub mod transport;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ClientConfig;

/// Entry point of the `parley` binary.
///
/// Diagnostics go to stderr so they never interleave with the chat log on
/// stdout. The session loop runs on a single thread.
pub fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,parley_client_lib=info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!(
        "Starting {} client v{}",
        parley_shared::constants::APP_NAME,
        env!("CARGO_PKG_VERSION")
    );

    let config = ClientConfig::load();
    tracing::info!(?config, "Loaded configuration");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(app::run_session(config));

    // A pending stdin read would otherwise hold shutdown until the next line.
    runtime.shutdown_background();
    result
}
