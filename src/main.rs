use clap::Parser;
use ee_tile_proxy::app::server;
use ee_tile_proxy::utils::error::ErrorSeverity;
use ee_tile_proxy::utils::{logger, validation::Validate};
use ee_tile_proxy::{CliArgs, EarthEngineClient, ProxyError, ServerConfig, ServiceAccountKey};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在時直接使用行程環境
    let dotenv = dotenvy::dotenv();

    let args = CliArgs::parse();
    let config = ServerConfig::from_env().map(|env| args.clone().apply(env));

    // 設定讀取失敗時仍要有日誌，退回命令列旗標
    let (verbose, json_logs) = match &config {
        Ok(config) => (config.verbose, config.json_logs),
        Err(_) => (args.verbose, args.json_logs),
    };
    logger::init_logger(verbose, json_logs);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let (config, key) = match config.and_then(load_credentials) {
        Ok(loaded) => loaded,
        Err(e) => exit_with(e),
    };
    tracing::debug!("Server config: {:?}", config);

    // 認證失敗就不啟動，不重試
    let client = match EarthEngineClient::connect(&config, key).await {
        Ok(client) => client,
        Err(e) => exit_with(e),
    };

    let listener = match server::bind(&config).await {
        Ok(listener) => listener,
        Err(e) => exit_with(e),
    };
    server::serve(listener, Arc::new(client)).await?;
    Ok(())
}

fn load_credentials(config: ServerConfig) -> ee_tile_proxy::Result<(ServerConfig, ServiceAccountKey)> {
    config.validate()?;

    let key = ServiceAccountKey::from_env()?;
    key.validate()?;

    Ok((config, key))
}

fn exit_with(e: ProxyError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
