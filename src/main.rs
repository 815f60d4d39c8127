use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tier_billing::adapters::http::{app_router, AuthState, BillingAppState};
use tier_billing::adapters::{
    CachedTierSettingsStore, JwtConfig, JwtSessionValidator, PostgresSubscriptionRepository,
    PostgresTierSettingsStore, PostgresUserRepository, RazorpayConfig, RazorpayGateway,
};
use tier_billing::application::{
    CreateSubscriptionHandler, HandleGatewayWebhookHandler, ReconciliationEngine,
};
use tier_billing::config::{AppConfig, ServerConfig};
use tier_billing::ports::TierSettingsStore;

fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.connect_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let settings: Arc<dyn TierSettingsStore> = Arc::new(CachedTierSettingsStore::new(
        Arc::new(PostgresTierSettingsStore::new(pool.clone())),
        config.payment.settings_cache_ttl(),
    ));

    let engine = ReconciliationEngine::new(
        Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool.clone())),
    );

    let webhook_handler =
        HandleGatewayWebhookHandler::new(config.payment.webhook_secret(), settings.clone(), engine);

    let gateway = RazorpayGateway::new(
        RazorpayConfig::new(config.payment.key_id(), config.payment.key_secret())
            .with_base_url(&config.payment.api_base_url),
    );
    let create_subscription_handler =
        CreateSubscriptionHandler::new(settings.clone(), Arc::new(gateway))
            .with_total_count(config.payment.subscription_total_count);

    let mut jwt = JwtConfig::new(config.auth.jwt_secret());
    if let Some(issuer) = &config.auth.jwt_issuer {
        jwt = jwt.with_issuer(issuer);
    }
    let auth: AuthState = Arc::new(JwtSessionValidator::new(jwt));

    let state = BillingAppState {
        webhook_handler: Arc::new(webhook_handler),
        create_subscription_handler: Arc::new(create_subscription_handler),
    };

    let app = app_router(state, auth)
        .layer(cors_layer(&config.server))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening for incoming connections");

    axum::serve(listener, app).await?;

    Ok(())
}
