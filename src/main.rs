//! Batchpress - A batch image conversion server.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use batchpress::{
    config::Config,
    convert::{AvifencEncoder, BatchConverter, Converter, WebpEncoder},
    server::{create_router, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Batchpress v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  AVIF encoder: {}", config.avifenc_bin.display());
    info!(
        "  AVIF quantizers: {}-{}",
        config.avif_min_quantizer, config.avif_max_quantizer
    );
    info!("  Encode timeout: {}s", config.encode_timeout);
    info!(
        "  Upload limit: {}MB",
        config.max_upload_bytes / (1024 * 1024)
    );
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    // WEBP is always available in-process; AVIF depends on the external
    // binary being installed, so probe it up front.
    match check_avifenc(&config.avifenc_bin).await {
        Ok(()) => info!("  avifenc: found"),
        Err(e) => {
            warn!("  avifenc: NOT FOUND ({})", e);
            warn!("  AVIF conversions will fail until it is installed");
        }
    }

    let avif = AvifencEncoder::new()
        .with_binary(&config.avifenc_bin)
        .with_quantizers(config.avif_min_quantizer, config.avif_max_quantizer)
        .with_timeout(Duration::from_secs(config.encode_timeout));

    let converter = Converter::new(WebpEncoder::new(), avif);
    let batch = BatchConverter::new(converter);

    let router = create_router(batch, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/", addr);
    info!(
        "    curl -X POST http://{}/convert-batch \\",
        addr
    );
    info!("         -H 'Authorization: Bearer <token>' \\");
    info!("         -F 'files=@photo.jpg' -F 'format=webp' -o converted.zip");
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Check that the external AVIF encoder can be invoked.
async fn check_avifenc(binary: &std::path::Path) -> Result<(), String> {
    let output = tokio::process::Command::new(binary)
        .arg("--version")
        .output()
        .await
        .map_err(|e| e.to_string())?;

    if output.status.success() {
        Ok(())
    } else {
        Err(format!("exited with {}", output.status))
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "batchpress=debug,tower_http=debug"
    } else {
        "batchpress=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new(&config.auth_token)
        .with_max_upload_bytes(config.max_upload_bytes)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
