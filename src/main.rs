use promptcanvas::{logger, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let config = Config::from_env();

    logger::init_with_config(logger::LoggerConfig::for_service(&config))?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    if let Err(e) = promptcanvas::server::run(config).await {
        log::error!("❌ {}", e);
        return Err(e.into());
    }
    Ok(())
}
