//! Main entry point for Birdcount.

use anyhow::anyhow;
use birdcount_cli::{App, Args, Outcome};
use birdcount_common::{bootstrap_subscriber, init_logging};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The configured subscriber needs the configuration, so loading it logs
    // through a stderr subscriber at the command line level.
    let bootstrap = bootstrap_subscriber(args.log_level.as_deref().unwrap_or("info"));
    let app = tracing::subscriber::with_default(bootstrap, || App::new(&args))?;

    init_logging(&app.config().logging).map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting Birdcount");

    match app.run().await {
        Ok(Outcome::Json(json)) => println!("{json}"),
        Ok(Outcome::Chart(path)) => println!("Chart saved to {}", path.display()),
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
