//! HTTP client for the remote location directory backend.
//!
//! The backend owns the forest; this client is a thin fetch/store boundary.
//! Calls are made with the operator's bearer token, fail without retry, and
//! leave recovery to the operator (a failed call keeps the prior UI state).

use crate::config::DirectorySettings;
use crate::models::location::{LocationNode, LocationsResponse};
use anyhow::Result;
use portal_core::observability::TracedClientExt;
use reqwest::Client;

pub struct DirectoryClient {
    client: Client,
    settings: DirectorySettings,
}

impl DirectoryClient {
    pub fn new(settings: DirectorySettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    /// Exchange operator credentials for a token pair.
    pub async fn login(&self, body: serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}/api/auth/login", self.settings.url);

        let response = self
            .client
            .traced_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send login request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        Ok(response)
    }

    /// Fetch the entire forest. There is no partial or paged read.
    pub async fn get_locations(&self, access_token: &str) -> Result<Vec<LocationNode>> {
        let url = format!("{}/api/Location/getLocations", self.settings.url);

        let response = self
            .client
            .traced_get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send GET request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Directory returned {} for {}", status, url);
            anyhow::bail!("Directory service returned {}", status);
        }

        let body: LocationsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to decode locations response: {}", e);
            anyhow::anyhow!("Invalid locations response: {}", e)
        })?;

        Ok(body.location)
    }

    /// Create a new top-level node.
    pub async fn create_location(&self, access_token: &str, node: &LocationNode) -> Result<()> {
        let url = format!("{}/api/Location/createLocation", self.settings.url);

        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(access_token)
            .json(node)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Directory returned {} for {}", status, url);
            anyhow::bail!("Directory service returned {}", status);
        }

        Ok(())
    }

    /// Replace one top-level node by id.
    pub async fn update_location(
        &self,
        access_token: &str,
        id: &str,
        node: &LocationNode,
    ) -> Result<()> {
        let url = format!("{}/api/Location/updateLocation/{}", self.settings.url, id);

        let response = self
            .client
            .traced_put(&url)
            .bearer_auth(access_token)
            .json(node)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send PUT request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Directory returned {} for {}", status, url);
            anyhow::bail!("Directory service returned {}", status);
        }

        Ok(())
    }

    /// Delete one top-level node by id.
    pub async fn delete_location(&self, access_token: &str, id: &str) -> Result<()> {
        let url = format!("{}/api/Location/deleteLocation/{}", self.settings.url, id);

        let response = self
            .client
            .traced_delete(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send DELETE request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Directory returned {} for {}", status, url);
            anyhow::bail!("Directory service returned {}", status);
        }

        Ok(())
    }
}
