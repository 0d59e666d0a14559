mod admin;
mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod fragment;
mod gateway;
mod models;
mod pages;
mod routes;
mod session;
mod state;
mod storage;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::gateway::postgres::{PgAuthGateway, PgDataGateway};
use crate::gateway::s3::S3StorageGateway;
use crate::gateway::BucketConfig;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::setup::ensure_bucket;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hera portal v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL, with migrations applied
    let db = create_pool(&config.database_url).await?;

    // S3 / MinIO
    let bucket = BucketConfig::resumes(&config.s3_bucket);
    let s3 = build_s3_client(&config).await;
    let storage = Arc::new(S3StorageGateway::new(s3, bucket.clone(), &config.s3_public_url));
    info!("S3 client initialized (bucket: {})", bucket.name);

    // The portal still serves pages without storage; uploads report it.
    if let Err(e) = ensure_bucket(storage.as_ref(), &bucket).await {
        warn!("Resume bucket setup failed: {e}");
    }

    let state = AppState {
        auth: Arc::new(PgAuthGateway::new(
            db.clone(),
            config.session_ttl_hours,
            config.admin_grant_ttl_hours,
        )),
        data: Arc::new(PgDataGateway::new(db)),
        storage,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the public hostname is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "hera-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
