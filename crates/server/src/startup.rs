use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, AuthSettings, ServerConfig};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::auth::{
    password::PasswordHasher, repo::seaorm::SeaOrmUserRepository, repository::UserRepository,
    token::TokenIssuer, AuthService,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Wire the auth service over any credential store. The signing secret is
/// read from `settings` here and nowhere else.
pub fn build_state(repo: Arc<dyn UserRepository>, settings: &AuthSettings) -> Result<ServerState, StartupError> {
    let hasher = PasswordHasher::from_settings(settings)?;
    let tokens = TokenIssuer::new(&settings.jwt_secret);
    Ok(ServerState { auth: Arc::new(AuthService::new(repo, hasher, tokens)) })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Public entry: connect the store, migrate, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    common::env::ensure_uploads_dir(&cfg.storage.uploads_dir).await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!(event = "migrated", "database schema up to date");

    let repo: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository { db });
    let state = build_state(repo, &cfg.auth)?;
    let app: Router = routes::build_router(state, &cfg.storage.uploads_dir, build_cors());

    let addr = bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!(%addr, "server started on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
