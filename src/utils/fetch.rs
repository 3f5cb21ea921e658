//! Network fetching for the catalog and runtime configuration.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use crate::config::{AppConfig, CATALOG_URL, CONFIG_URL};
use crate::core::error::FetchError;
use crate::models::Dataset;

/// Fetch and parse JSON from a URL.
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Http(response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Json(e.to_string()))
}

/// Load the dataset catalog.
pub async fn fetch_catalog() -> Result<Vec<Dataset>, FetchError> {
    fetch_json(CATALOG_URL).await
}

/// Load `config.json`, falling back to defaults when it is missing or invalid.
pub async fn fetch_config() -> AppConfig {
    match fetch_json::<AppConfig>(CONFIG_URL).await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("using default configuration: {e}");
            AppConfig::default()
        }
    }
}
