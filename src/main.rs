//! VoteLive realtime gateway entry point.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use votelive::{AppState, build_router};
use votelive_auth::{AccessTokenDecoder, VoteTokenDecoder};
use votelive_cache::KvManager;
use votelive_core::config::AppConfig;
use votelive_core::error::AppError;
use votelive_realtime::RealtimeHub;
use votelive_realtime::fanout::RedisEventBridge;
use votelive_realtime::gateway::{LocalGateway, ManagedGateway, TransportGateway};
use votelive_realtime::server::Collaborators;
use votelive_service::{ElectionClient, ViewClient};

#[tokio::main]
async fn main() {
    let env = std::env::var("VOTELIVE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting VoteLive gateway v{}", env!("CARGO_PKG_VERSION"));

    let kv = KvManager::new(&config.cache).await?.store();

    let elections = Arc::new(ElectionClient::new(&config.backend, &config.cache, kv.clone())?);
    let views = Arc::new(ViewClient::new(&config.backend)?);
    let collaborators = Collaborators {
        manager_tokens: Arc::new(AccessTokenDecoder::new(&config.auth)),
        voter_tokens: Arc::new(VoteTokenDecoder::new(&config.auth)),
        elections,
        views,
    };

    // Transport backend is chosen here, once; nothing downstream branches
    // on deployment mode again.
    let mut local_gateway = None;
    let gateway: Arc<dyn TransportGateway> = match config.realtime.transport.as_str() {
        "local" => {
            let gateway = Arc::new(LocalGateway::new(config.realtime.channel_buffer_size));
            local_gateway = Some(gateway.clone());
            gateway
        }
        "managed" => Arc::new(ManagedGateway::new(&config.realtime.managed)?),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown transport: '{other}'. Supported: local, managed"
            )));
        }
    };
    tracing::info!(transport = %config.realtime.transport, "transport selected");

    let hub = Arc::new(RealtimeHub::new(
        &config.realtime,
        config.auth.clone(),
        kv.clone(),
        gateway,
        collaborators,
    ));

    // Domain change notifications arrive over Redis pub/sub when the store
    // is Redis; the memory provider is single-node and has no publisher.
    if config.cache.provider == "redis" {
        let bridge =
            RedisEventBridge::new(&config.cache.redis.url, &config.realtime.events_channel)?;
        let fanout = hub.fanout.clone();
        tokio::spawn(async move {
            if let Err(e) = bridge.run(fanout).await {
                tracing::error!("Event bridge stopped: {e}");
            }
        });
    } else {
        tracing::warn!("No event bridge configured; fanout only via direct calls");
    }

    let state = AppState {
        hub,
        local_gateway,
        kv,
        heartbeat_interval: Duration::from_secs(config.realtime.heartbeat_interval_seconds),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("VoteLive gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
