use crate::AppState;
use crate::utils::jwt::decode_jwt_claims;
use askama::Template;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {}
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> impl IntoResponse {
    if payload.validate().is_err() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html("<p class='text-danger small'>Enter a valid email and password</p>"),
        )
            .into_response();
    }

    let response = state
        .directory_client
        .login(serde_json::json!({
            "email": payload.email,
            "password": payload.password,
        }))
        .await;

    match response {
        Ok(res) if res.status().is_success() => {
            let tokens: serde_json::Value = res.json().await.unwrap_or_default();

            let access_token = tokens["access_token"].as_str().unwrap_or_default();

            // The token came from the backend over HTTPS; decode identity
            // fields for the session without re-validating the signature.
            match decode_jwt_claims(access_token) {
                Ok(claims) => {
                    session.insert("access_token", access_token).await.unwrap();
                    session
                        .insert(
                            "refresh_token",
                            tokens["refresh_token"].as_str().unwrap_or_default(),
                        )
                        .await
                        .unwrap();
                    session.insert("user_id", &claims.sub).await.unwrap();
                    session.insert("email", &claims.email).await.unwrap();

                    tracing::info!(
                        user_id = %claims.sub,
                        email = %claims.email,
                        "Operator logged in successfully"
                    );

                    let mut headers = HeaderMap::new();
                    headers.insert("HX-Redirect", "/locations".parse().unwrap());
                    (StatusCode::OK, headers, "").into_response()
                }
                Err(e) => {
                    tracing::error!("Failed to decode JWT claims: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Html("<p class='text-danger small'>Authentication error</p>"),
                    )
                        .into_response()
                }
            }
        }
        _ => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html("<p class='text-danger small'>Invalid email or password</p>"),
        )
            .into_response(),
    }
}

pub async fn logout_handler(session: Session) -> impl IntoResponse {
    session.clear().await;

    let mut headers = HeaderMap::new();
    headers.insert("HX-Redirect", "/login".parse().unwrap());
    (StatusCode::OK, headers, "").into_response()
}
