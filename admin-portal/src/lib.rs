pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use services::directory_client::DirectoryClient;
use std::sync::Arc;

/// Shared application state containing the directory gateway client.
///
/// Built once at startup and injected everywhere; leaf handlers never read
/// tokens or endpoints from ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub directory_client: Arc<DirectoryClient>,
}

impl AppState {
    pub fn new(directory_client: Arc<DirectoryClient>) -> Self {
        Self { directory_client }
    }
}
