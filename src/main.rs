use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use climate_service::app::Application;
use climate_service::config::Config;
use climate_service::db;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables before reading config
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    info!("Starting climate service with config: {:?}", config);

    info!("Connecting to database...");
    let pool = db::connect(&config).await?;

    if config.database_init_schema {
        info!("Running database migrations...");
        db::run_migrations(&pool).await?;
    }

    let application = Application::build(config, pool).await?;
    application.run_until_stopped().await?;

    info!("Climate service stopped");
    Ok(())
}
