use anyhow::Context;
use safe_deployer::config::Config;
use safe_deployer::log_info;
use safe_deployer::startup::Application;
use safe_deployer::utils::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();
    init_logger();

    log_info!("Starting safe-deployer...");

    let config = Config::load().context("Failed to load application configuration")?;

    let application = Application::build(config)
        .await
        .context("Application building failed (provider/signer/Safe contracts)")?;

    log_info!("SafeFactory ready at {:#x}", application.factory.get_address());

    application
        .run()
        .await
        .context("Safe deployment failed")?;

    Ok(())
}
