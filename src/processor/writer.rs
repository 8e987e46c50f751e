//! InfluxDB writing module
//!
//! Encodes delay points as 1.x line protocol and posts each batch to the
//! `/write` endpoint with second precision.

use crate::config::InfluxConfig;
use crate::constants::{
    fields, INFLUX_WRITE_TIMEOUT_SECS, MEASUREMENT_NAME, SERVICE_TAG_KEY, SERVICE_TAG_VALUE,
    WRITE_PRECISION, write_endpoint,
};
use crate::error::{Result, RttError};
use crate::models::DelayPoint;
use std::time::Duration;
use tracing::debug;

/// Writer for one InfluxDB database
#[derive(Debug)]
pub struct InfluxWriter {
    config: InfluxConfig,
}

impl InfluxWriter {
    /// Create a new writer
    pub fn new(config: InfluxConfig) -> Self {
        Self { config }
    }

    /// Write one batch of points.
    ///
    /// The HTTP client lives for exactly one call; connections are not kept
    /// across batches. A non-2xx response is fatal and carries the status
    /// and response body.
    pub async fn write_batch(&self, points: &[DelayPoint]) -> Result<usize> {
        if points.is_empty() {
            return Ok(0);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(INFLUX_WRITE_TIMEOUT_SECS))
            .build()?;

        let body = encode_batch(points);
        debug!(
            "Writing {} points to {} (database {})",
            points.len(),
            self.config.url,
            self.config.database
        );

        let response = client
            .post(write_endpoint(&self.config.url))
            .query(&[
                ("db", self.config.database.as_str()),
                ("precision", WRITE_PRECISION),
            ])
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RttError::InfluxWriteRejected {
                database: self.config.database.clone(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(points.len())
    }
}

/// Encode a batch as newline-separated line protocol
pub fn encode_batch(points: &[DelayPoint]) -> String {
    points
        .iter()
        .map(encode_point)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encode one point:
/// `services,service=service arrival_delay=5i,... 1579075500`
pub fn encode_point(point: &DelayPoint) -> String {
    let mut field_set = vec![
        format!("{}={}i", fields::ARRIVAL_DELAY, point.arrival_delay),
        format!("{}={}i", fields::DEPARTURE_DELAY, point.departure_delay),
        string_field(fields::PLATFORM, &point.platform),
        string_field(fields::ORIGIN, &point.origin),
        string_field(fields::DESTINATION, &point.destination),
        string_field(fields::OPERATOR, &point.operator),
    ];
    if let Some(code) = &point.cancellation_code {
        field_set.push(string_field(fields::CANCELLATION_CODE, code));
    }

    format!(
        "{},{}={} {} {}",
        escape_measurement(MEASUREMENT_NAME),
        escape_tag(SERVICE_TAG_KEY),
        escape_tag(SERVICE_TAG_VALUE),
        field_set.join(","),
        point.timestamp.timestamp()
    )
}

fn string_field(key: &str, value: &str) -> String {
    format!("{}=\"{}\"", key, escape_field_string(value))
}

/// Measurement names escape commas and spaces
fn escape_measurement(value: &str) -> String {
    value.replace(',', "\\,").replace(' ', "\\ ")
}

/// Tag keys and values escape commas, equals signs, and spaces
fn escape_tag(value: &str) -> String {
    value
        .replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

/// String field values escape backslashes and double quotes
fn escape_field_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
