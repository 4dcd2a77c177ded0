use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post},
};
use portal_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::AppState;
use crate::config::Settings;
use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page, logout_handler},
    locations::{
        delete_location, editor_add_secondary, editor_add_third, editor_cancel, editor_open,
        editor_remove_secondary, editor_remove_third, editor_select_primary, editor_submit,
        locations_page, options_api, suggest_api,
    },
};
use crate::middleware::auth::auth_middleware;
use crate::services::directory_client::DirectoryClient;
use std::sync::Arc;

pub fn build_router(app_state: AppState) -> Router {
    // Session setup: the server-side stand-in for the original's browser
    // local storage (token + in-progress editor)
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    let protected = Router::new()
        .route("/locations", get(locations_page))
        .route("/locations/:id", delete(delete_location))
        .route("/locations/editor/open", post(editor_open))
        .route("/locations/editor/cancel", post(editor_cancel))
        .route("/locations/editor/add-secondary", post(editor_add_secondary))
        .route(
            "/locations/editor/remove-secondary",
            post(editor_remove_secondary),
        )
        .route("/locations/editor/add-third", post(editor_add_third))
        .route("/locations/editor/remove-third", post(editor_remove_third))
        .route(
            "/locations/editor/select-primary",
            post(editor_select_primary),
        )
        .route("/locations/editor/submit", post(editor_submit))
        .route("/api/locations/options", get(options_api))
        .route("/api/locations/suggest", get(suggest_api))
        .layer(from_fn(auth_middleware));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler))
        .merge(protected)
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(app_state)
}

/// A built portal bound to its listener, ready to run.
///
/// Splitting build from run lets tests spawn the app on a random port and
/// learn which one it got.
pub struct Application {
    port: u16,
    listener: tokio::net::TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let directory_client = Arc::new(DirectoryClient::new(settings.directory_service.clone()));
        let app_state = AppState::new(directory_client);
        let router = build_router(app_state);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
