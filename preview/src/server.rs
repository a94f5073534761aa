//! HTTP server for the built frontend bundle

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::any;
use multi_inventory_shared::env::API_PREFIX;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::PreviewConfig;
use crate::error::{PreviewError, Result};
use crate::{host, proxy};

/// State shared across handlers
pub struct AppState {
    pub config: PreviewConfig,
    /// 代理复用同一个连接池
    pub client: reqwest::Client,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: PreviewConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(PreviewError::Client)?;
        Ok(Self { config, client })
    }
}

/// Create the Axum application
///
/// 未命中 `/api` 的请求交给静态文件服务；文件不存在时返回 `index.html`，
/// 由前端路由处理 history 模式的地址。
pub fn build_router(state: SharedState) -> Router {
    let dist = &state.config.dist;
    let static_files = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));

    Router::new()
        .route(API_PREFIX, any(proxy::forward))
        .route(&format!("{}/{{*rest}}", API_PREFIX), any(proxy::forward))
        .fallback_service(static_files)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            host::require_allowed_host,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and run until Ctrl-C
pub async fn serve(config: PreviewConfig) -> Result<()> {
    let addr = config.bind;
    let state = Arc::new(AppState::new(config)?);

    info!(
        dist = %state.config.dist.display(),
        hosts = ?state.config.allowed_hosts,
        proxy = state.config.proxy_target.as_deref().unwrap_or("-"),
        "starting preview server"
    );
    if !state.config.dist.join("index.html").is_file() {
        tracing::warn!(dist = %state.config.dist.display(), "index.html not found, run `trunk build` first");
    }

    let app = build_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| PreviewError::Bind { addr, source })?;

    info!("Preview server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Preview server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
