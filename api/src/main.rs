use std::sync::Arc;

use actix_web::{cookie::Key, HttpServer};
use anyhow::Context;
use log::{info, warn};

use pv_api::app::{build_state, create_app};
use pv_api::config::Config;
use pv_api::middleware::SecurityMiddleware;
use pv_api::session::{signing_key, SessionCookie};
use pv_core::services::{SessionStore, VerificationProvider};
use pv_infra::{MemorySessionStore, MockVerifyProvider, RedisSessionStore, VonageVerifyClient};
use pv_shared::config::{ProviderKind, SessionBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting PhoneVerify server");

    let config = Config::from_env().context("failed to load configuration")?;
    let key = signing_key(&config.app.session, config.app.environment)
        .context("failed to build the session signing key")?;

    match config.app.provider.kind {
        ProviderKind::Vonage => {
            let provider = VonageVerifyClient::from_config(&config.app.provider)
                .context("failed to create the Vonage Verify client")?;
            with_store(&config, Arc::new(provider), key).await
        }
        ProviderKind::Mock => {
            if config.is_production() {
                warn!("Mock verification provider enabled in production");
            }
            let provider = match &config.mock_pin {
                Some(pin) => MockVerifyProvider::with_pin(pin.clone()),
                None => MockVerifyProvider::new(),
            };
            with_store(&config, Arc::new(provider), key).await
        }
    }
}

/// Pick the session store and run the server
async fn with_store<P>(config: &Config, provider: Arc<P>, key: Key) -> anyhow::Result<()>
where
    P: VerificationProvider + 'static,
{
    match config.app.session.backend {
        SessionBackend::Memory => {
            info!("Using in-memory session store");
            serve(config, provider, Arc::new(MemorySessionStore::new()), key).await
        }
        SessionBackend::Redis => {
            let store = RedisSessionStore::connect(&config.app.session.redis_url)
                .await
                .context("failed to connect the Redis session store")?;
            serve(config, provider, Arc::new(store), key).await
        }
    }
}

async fn serve<P, S>(
    config: &Config,
    provider: Arc<P>,
    store: Arc<S>,
    key: Key,
) -> anyhow::Result<()>
where
    P: VerificationProvider + 'static,
    S: SessionStore + 'static,
{
    let cookie = SessionCookie::from_config(&config.app.session, key);
    let state = build_state(&config.app, provider, store, cookie);
    let environment = config.app.environment;
    let trusted_proxies = config.app.server.trusted_proxies.clone();

    let bind_address = config.app.server.bind_address();
    info!(
        "Server will bind to: {} (environment={}, provider={:?})",
        bind_address, environment, config.app.provider.kind
    );

    let mut server = HttpServer::new(move || {
        create_app(
            state.clone(),
            SecurityMiddleware::for_environment(environment, &trusted_proxies),
        )
    });
    if config.app.server.workers > 0 {
        server = server.workers(config.app.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server error")
}
