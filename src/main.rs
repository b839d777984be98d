use tower_http::trace::TraceLayer;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

use carbdex::cache::ResponseCache;
use carbdex::config::Config;
use carbdex::db::{ self, AppState };
use carbdex::{ middleware, routes };

#[tokio::main]
async fn main() {
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "carbdex=debug,tower_http=debug,axum::rejection=trace".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Environment: {:?}", config.server.environment);
    tracing::info!("CORS enabled: {}", config.security.cors_enabled);
    tracing::info!("Response cache enabled: {}", config.cache.enabled);

    let store = db::setup_database(&config).await.expect("Failed to connect to Postgres");

    let cache = if config.cache.enabled {
        let redis = db::setup_redis(&config).await.expect("Failed to connect to Redis");
        ResponseCache::new(redis, config.cache.ttl_secs)
    } else {
        ResponseCache::disabled()
    };

    let state = AppState {
        store,
        cache,
        config: config.clone(),
    };

    let app = routes
        ::create_routes(state)
        .layer(middleware::cors::setup_cors(&config))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Carbdex API server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Failed to start server");
}
