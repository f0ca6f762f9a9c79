use crate::errors::{ApiError, PredictionError};
use crate::logging::*;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::PathBuf;
use tokio::fs;

const PREDICTION_KEY_HEADER: &str = "Prediction-Key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub prediction_key: String,
    pub image_path: PathBuf,
    pub url: String,
}

/// Sends a single image to a published prediction endpoint.
pub struct PredictionClient {
    client: Client,
}

impl Default for PredictionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Returns the response body exactly as received.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<String, PredictionError> {
        let log = DEFAULT.new(o!("function" => "PredictionClient::predict"));

        let image = fs::read(&request.image_path)
            .await
            .map_err(|source| PredictionError::Image {
                path: request.image_path.clone(),
                source,
            })?;
        info!(log, "sending prediction request";
            "url" => &request.url,
            "bytes" => image.len(),
        );

        let response = self
            .client
            .post(&request.url)
            .header(PREDICTION_KEY_HEADER, &request.prediction_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        debug!(log, "prediction response"; "status" => status.as_u16(), "bytes" => body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests;
