use admin_portal::config::{DirectorySettings, ServerSettings, Settings};
use admin_portal::models::location::{
    AreaNode, BuildingNode, CityNode, LocationNode, StateNode,
};
use admin_portal::startup::Application;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use base64::{Engine as _, engine::general_purpose};
use secrecy::Secret;
use std::sync::{Arc, Mutex};

pub const TEST_EMAIL: &str = "operator@example.com";
pub const TEST_PASSWORD: &str = "guard-duty";

/// Shared, inspectable state of the mock directory backend.
#[derive(Clone, Default)]
pub struct DirectoryState {
    pub forest: Arc<Mutex<Vec<LocationNode>>>,
    pub created: Arc<Mutex<Vec<LocationNode>>>,
    pub updated: Arc<Mutex<Vec<(String, LocationNode)>>>,
    pub deleted: Arc<Mutex<Vec<String>>>,
    /// When set, every location endpoint answers 500.
    pub fail: Arc<Mutex<bool>>,
}

fn test_token(email: &str) -> String {
    let payload = serde_json::json!({
        "sub": "op_1",
        "email": email,
        "exp": 9999999999i64,
        "iat": 1754600000,
    });
    let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("e30.{}.sig", body)
}

async fn mock_login(Json(body): Json<serde_json::Value>) -> axum::response::Response {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    if password != TEST_PASSWORD {
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    }

    Json(serde_json::json!({
        "access_token": test_token(&email),
        "refresh_token": "test-refresh-token",
    }))
    .into_response()
}

async fn mock_get_locations(State(state): State<DirectoryState>) -> axum::response::Response {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    if *state.fail.lock().unwrap() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let forest = state.forest.lock().unwrap().clone();
    Json(serde_json::json!({ "Location": forest })).into_response()
}

async fn mock_create(
    State(state): State<DirectoryState>,
    Json(node): Json<LocationNode>,
) -> axum::response::Response {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    if *state.fail.lock().unwrap() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    state.created.lock().unwrap().push(node);
    Json(serde_json::json!({ "status": "created" })).into_response()
}

async fn mock_update(
    State(state): State<DirectoryState>,
    Path(id): Path<String>,
    Json(node): Json<LocationNode>,
) -> Json<serde_json::Value> {
    state.updated.lock().unwrap().push((id, node));
    Json(serde_json::json!({ "status": "updated" }))
}

async fn mock_delete(
    State(state): State<DirectoryState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    state.deleted.lock().unwrap().push(id);
    Json(serde_json::json!({ "status": "deleted" }))
}

async fn spawn_mock_directory(state: DirectoryState) -> String {
    let router = Router::new()
        .route("/api/auth/login", post(mock_login))
        .route("/api/Location/getLocations", get(mock_get_locations))
        .route("/api/Location/createLocation", post(mock_create))
        .route("/api/Location/updateLocation/:id", put(mock_update))
        .route("/api/Location/deleteLocation/:id", delete(mock_delete))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock directory listener");
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", address)
}

/// The default fixture forest used across the suite.
pub fn sample_forest() -> Vec<LocationNode> {
    vec![
        LocationNode {
            id: Some("hq-1".into()),
            primary_location: "HQ".into(),
            sub_locations: vec![StateNode {
                id: Some("st-1".into()),
                primary_sub_location: "Texas".into(),
                secondary_locations: vec![
                    CityNode {
                        id: Some("c-1".into()),
                        secondary_location: "Austin".into(),
                        secondary_sub_locations: vec![AreaNode {
                            id: Some("a-1".into()),
                            secondary_sub_location: "Downtown".into(),
                            third_locations: vec![BuildingNode {
                                id: Some("b-1".into()),
                                third_location: "Tower 1".into(),
                                third_sub_location: Some("Lobby".into()),
                            }],
                        }],
                    },
                    CityNode {
                        id: Some("c-2".into()),
                        secondary_location: "Dallas".into(),
                        secondary_sub_locations: vec![],
                    },
                ],
            }],
            created_at: None,
        },
        LocationNode {
            id: Some("ca-1".into()),
            primary_location: "Campus A".into(),
            sub_locations: vec![StateNode {
                id: Some("st-2".into()),
                primary_sub_location: "North Wing".into(),
                secondary_locations: vec![CityNode {
                    id: Some("c-3".into()),
                    secondary_location: "Floor 1".into(),
                    secondary_sub_locations: vec![],
                }],
            }],
            created_at: None,
        },
    ]
}

pub struct TestApp {
    pub address: String,
    pub directory: DirectoryState,
    /// Cookie-holding client: one logged-in operator session.
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_forest(sample_forest()).await
    }

    pub async fn spawn_with_forest(forest: Vec<LocationNode>) -> Self {
        let directory = DirectoryState::default();
        *directory.forest.lock().unwrap() = forest;

        let backend_url = spawn_mock_directory(directory.clone()).await;

        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port for testing
                session_secret: Secret::new("test-secret".to_string()),
                otlp_endpoint: None,
                log_level: "info".to_string(),
            },
            directory_service: DirectorySettings { url: backend_url },
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build test client");

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            directory,
            client,
        }
    }

    /// Log the shared client in; its cookie jar holds the session afterwards.
    pub async fn login(&self) {
        let response = self
            .client
            .post(format!("{}/login", self.address))
            .form(&[("email", TEST_EMAIL), ("password", TEST_PASSWORD)])
            .send()
            .await
            .expect("Failed to execute login request");
        assert!(
            response.status().is_success(),
            "login failed with {}",
            response.status()
        );
    }

    /// A fresh client with no session and no redirect following, for
    /// asserting auth redirects.
    pub fn anonymous_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build anonymous client")
    }
}
