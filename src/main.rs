use inkgen::{logger, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    logger::init_with_config(config.logger.clone())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.host(),
        config.port(),
    );
    logger::log_config_info(&config);

    if let Err(e) = config.gemini.require_api_key() {
        log::error!("❌ {}", e);
        return Err(e.into());
    }

    if let Err(e) = inkgen::server::run(config).await {
        log::error!("❌ Server stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}
