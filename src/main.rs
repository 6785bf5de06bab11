use anyhow::Result;
use bff_triage::infrastructure::{directories, logging, shutdown};
use bff_triage::{app, config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let (shutdown, _) = shutdown::Shutdown::new();
    shutdown::install_signal_handlers(shutdown.clone());

    let app = app::TriageApp::initialize(config, shutdown.clone())?;
    app.run().await
}
