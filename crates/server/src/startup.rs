use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::storage::JsonUserStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

/// Permissive CORS; answers browser preflights on every route.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Build the router backed by the JSON users file named in `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    common::env::ensure_users_file(&cfg.storage.users_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let store = JsonUserStore::new(cfg.storage.users_file.clone());
    let state = ServerState::new(Arc::new(store));
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, users_file = %cfg.storage.users_file.display(), "starting auth server");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_addr_is_all_interfaces() {
        let addr = load_bind_addr(&AppConfig::default()).unwrap();
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn hostname_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(load_bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }
}
