//! Live station fetch against the Realtime Trains API.
//!
//! A thin authenticated GET on the station search endpoint; the response
//! body is the same schema as an on-disk snapshot, so everything downstream
//! of the fetch is shared with the file-based import path.

use crate::config::RttConfig;
use crate::constants::{RTT_FETCH_TIMEOUT_SECS, search_endpoint};
use crate::error::{Result, RttError};
use crate::models::Station;
use std::time::Duration;
use tracing::debug;

/// Authenticated client for the RTT JSON API
#[derive(Debug)]
pub struct RttClient {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl RttClient {
    /// Build a client from configuration. Both credentials are required.
    pub fn new(config: &RttConfig) -> Result<Self> {
        let (username, password) = match (&config.username, &config.password) {
            (Some(username), Some(password)) => (username.clone(), password.clone()),
            _ => {
                return Err(RttError::Configuration {
                    message: "RTT credentials are not configured; \
                              set RTT_USERNAME and RTT_PASSWORD"
                        .to_string(),
                });
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RTT_FETCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            username,
            password,
            client,
        })
    }

    /// Fetch today's schedule document for a station.
    ///
    /// Credentials travel in the Authorization header, never in the URL.
    pub async fn search_station(&self, station: &str) -> Result<Station> {
        let url = search_endpoint(&self.base_url, station);
        debug!("Fetching station schedule from {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RttError::FetchRejected {
                station: station.to_string(),
                status: status.as_u16(),
            });
        }

        let station_doc = response.json::<Station>().await?;
        debug!(
            "Fetched {} services for {}",
            station_doc.services().len(),
            station
        );
        Ok(station_doc)
    }
}
