//! Municipality directory client (IBGE localidades).
//!
//! The directory lives on a public host separate from the Sentinela
//! backend, so requests carry no bearer token and no observer is
//! involved. The fetched list feeds `CityIndex` for local filtering.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::models::Municipality;

use super::{ApiError, ApiResult};

/// Default directory endpoint (Brazilian municipalities)
pub const DEFAULT_DIRECTORY_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// HTTP request timeout in seconds. The full municipality list is a
/// few hundred kB, so this is generous.
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct CityDirectory {
    client: Client,
    base_url: String,
}

impl CityDirectory {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the full municipality list
    pub async fn fetch_municipalities(&self) -> ApiResult<Vec<Municipality>> {
        let url = format!("{}/municipios", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let cities: Vec<Municipality> = response.json().await?;
        debug!(count = cities.len(), "Fetched municipality list");
        Ok(cities)
    }
}
