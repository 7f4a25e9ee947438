mod config;
mod db;
mod errors;
mod matching;
mod models;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, S3Config};
use crate::db::{create_pool, ensure_schema};
use crate::matching::Matcher;
use crate::resumes::blobs::{BlobStore, MemoryBlobStore, S3BlobStore};
use crate::resumes::seed::seed_samples;
use crate::resumes::store::{MemoryResumeStore, PgResumeStore, ResumeStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Résumé rows: PostgreSQL when configured, memory otherwise
    let store: Arc<dyn ResumeStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgResumeStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, keeping resumes in memory");
            Arc::new(MemoryResumeStore::new())
        }
    };

    // Upload bytes: S3 / MinIO when configured, memory otherwise
    let blobs: Arc<dyn BlobStore> = match &config.s3 {
        Some(s3) => {
            let client = build_s3_client(s3).await;
            info!("S3 client initialized (bucket: {})", s3.bucket);
            Arc::new(S3BlobStore::new(client, s3.bucket.clone()))
        }
        None => {
            info!("S3_BUCKET not set, keeping uploads in memory");
            Arc::new(MemoryBlobStore::new())
        }
    };

    if config.seed_sample_resumes {
        seed_samples(store.as_ref(), blobs.as_ref()).await?;
    }

    let matcher = Arc::new(Matcher::new(config.matcher.clone()));
    info!(
        "Matcher ready: {} skills, top_k={}, max_features={:?}",
        matcher.catalog().len(),
        matcher.config().default_top_k,
        matcher.config().vectorizer.max_features
    );

    // Build app state
    let state = AppState {
        store,
        blobs,
        matcher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (custom endpoint) or AWS.
async fn build_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let Some((access_key_id, secret_access_key)) = &config.credentials {
        loader = loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "matcher-static",
        ));
    }
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    // MinIO serves buckets under the path, not a subdomain.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(config.endpoint.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
