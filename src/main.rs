use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use hierchat::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = Settings::from_env_and_args(&args);

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(target: "hierchat", "hierchat server starting: RUST_LOG='{}'", rust_log);

    hierchat::server::run(settings).await
}
