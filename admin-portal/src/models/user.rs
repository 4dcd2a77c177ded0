use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OperatorProfile {
    pub email: String,
}

impl OperatorProfile {
    pub fn name(&self) -> String {
        self.email.split('@').next().unwrap_or("Operator").to_string()
    }
}

/// Authenticated operator context extracted from the session.
///
/// The access token lives server-side in the session, never in leaf
/// components; every handler that talks to the directory backend receives it
/// through this extractor.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        let access_token: Option<String> = session.get("access_token").await.unwrap_or(None);
        let user_id: Option<String> = session.get("user_id").await.unwrap_or(None);
        let email: Option<String> = session.get("email").await.unwrap_or(None);

        match (access_token, user_id, email) {
            (Some(token), Some(uid), Some(email_val)) => Ok(AuthUser {
                user_id: uid,
                email: email_val,
                access_token: token,
            }),
            _ => Err(Redirect::to("/login").into_response()),
        }
    }
}
