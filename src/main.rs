use std::sync::Arc;

use tandem_api::{
    config::Config,
    db::{self, Cache, PgMetrics},
    routes::{create_router, AppState},
    services::{
        providers::{FoursquareClient, OpenAiClient, RawgClient, TmdbClient, UnsplashClient},
        GenerationPipeline, ImageEnricher,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let pool = db::create_pool(&config.database_url).await?;
    let metrics = Arc::new(PgMetrics::new(pool));

    let model = Arc::new(OpenAiClient::new(
        config.openai_api_key,
        config.openai_api_url,
    ));
    let enricher = ImageEnricher::new(
        Arc::new(TmdbClient::new(config.tmdb_api_key, config.tmdb_api_url)),
        Arc::new(FoursquareClient::new(config.fsq_api_key, config.fsq_api_url)),
        Arc::new(RawgClient::new(config.rawg_api_key, config.rawg_api_url)),
        Arc::new(UnsplashClient::new(
            config.unsplash_api_key,
            config.unsplash_api_url,
        )),
        metrics,
    );

    let pipeline = Arc::new(GenerationPipeline::new(
        model,
        enricher,
        config.mismatch_policy,
    ));

    let state = AppState { pipeline, cache };
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    cache_writer.shutdown().await;

    Ok(())
}
