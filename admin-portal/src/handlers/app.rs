use axum::response::{IntoResponse, Redirect};

pub async fn index() -> impl IntoResponse {
    Redirect::to("/locations")
}

pub async fn health_check() -> &'static str {
    "OK"
}
