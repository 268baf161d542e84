use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch_api::{
    config::Config,
    db::{self, Cache, InMemoryLibrary, PgLibrary, UserLibrary},
    routes::{create_router, AppState, RecommendationLimits},
    services::{
        providers::{OmdbProvider, RemoteRecommender},
        RecommendationService,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinematch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let library: Arc<dyn UserLibrary> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url)
                .await
                .context("failed to connect to PostgreSQL")?;
            let library = PgLibrary::new(pool);
            library
                .migrate()
                .await
                .context("failed to run library migrations")?;
            tracing::info!("Using PostgreSQL library");
            Arc::new(library)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, library is kept in memory");
            Arc::new(InMemoryLibrary::new())
        }
    };

    let redis_client =
        db::create_redis_client(&config.redis_url).context("invalid REDIS_URL")?;
    let (cache, cache_writer) = Cache::new(redis_client);

    let metadata = Arc::new(OmdbProvider::new(
        cache,
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    ));
    let candidates = Arc::new(RemoteRecommender::new(config.recommender_url.clone()));

    let state = Arc::new(AppState {
        recommendations: RecommendationService::new(library.clone(), candidates),
        library,
        metadata,
        limits: RecommendationLimits {
            default: config.default_recommendations,
            max: config.max_recommendations,
        },
    });

    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "cinematch-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cache_writer.shutdown().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
