//! Application state, router assembly, and serving

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use featws_core::{DisabledSynchronizer, GitlabSynchronizer, RulesheetService, Synchronizer};
use featws_gitlab::GitlabClient;
use featws_store::RulesheetStore;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::auth::{self, AuthMode, AuthState, JwksCache};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::{handlers, health};

/// Process-wide shared resources
///
/// Built once at startup; nothing here is replaced mid-run.
pub struct AppState {
    pub service: RulesheetService,
    pub store: RulesheetStore,
    pub auth: AuthState,
    /// Remote client kept for readiness probes; `None` when
    /// synchronization is disabled
    pub remote: Option<GitlabClient>,
}

pub type SharedState = Arc<AppState>;

/// Connect the store, build the synchronizer, and assemble shared state
pub async fn build_state(config: &ApiConfig) -> Result<SharedState> {
    let store = RulesheetStore::connect(&config.database_url).await?;
    store.migrate().await?;

    let (sync, remote): (Box<dyn Synchronizer>, Option<GitlabClient>) =
        if config.remote.is_enabled() {
            let synchronizer = GitlabSynchronizer::new(config.remote.clone())?;
            let client = synchronizer.client().clone();
            (Box::new(synchronizer), Some(client))
        } else {
            tracing::info!("no remote token configured, synchronization disabled");
            (Box::new(DisabledSynchronizer), None)
        };

    let jwks = if config.auth_modes.contains(&AuthMode::OpenAm) {
        let cache = Arc::new(JwksCache::new(config.openam_url.clone()));
        cache.spawn_background_refresh();
        Some(cache)
    } else {
        None
    };

    Ok(Arc::new(AppState {
        service: RulesheetService::new(store.clone(), sync),
        store,
        auth: AuthState {
            modes: config.auth_modes.clone(),
            api_key: config.api_key.clone(),
            jwks,
        },
        remote,
    }))
}

/// Assemble the router: `/api/v1` behind the auth chain, health probes
/// open, CORS applied to everything
pub fn build_router(state: SharedState, allow_origins: &str) -> Router {
    let api = Router::new()
        .route(
            "/rulesheets",
            get(handlers::list).post(handlers::create),
        )
        .route(
            "/rulesheets/:id",
            get(handlers::get)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    Router::new()
        .nest("/api/v1", api)
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .layer(cors_layer(allow_origins))
        .with_state(state)
}

fn cors_layer(allow_origins: &str) -> CorsLayer {
    let trimmed = allow_origins.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = trimmed
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind and serve until the process is stopped
pub async fn serve(config: ApiConfig) -> Result<()> {
    let state = build_state(&config).await?;
    let app = build_router(state, &config.allow_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, host = %config.external_host, "featws-api listening");

    axum::serve(listener, app).await?;
    Ok(())
}
