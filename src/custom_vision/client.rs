use super::TrainingApi;
use super::models::{ImageCreateSummary, Iteration, Project, Tag};
use crate::errors::ApiError;
use crate::logging::*;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

const TRAINING_KEY_HEADER: &str = "Training-Key";

/// REST client for the training half of the service.
pub struct TrainingClient {
    client: Client,
    base_url: String,
    training_key: String,
}

impl TrainingClient {
    pub fn new(endpoint: &str, api_version: &str, training_key: String) -> Self {
        let base_url = format!(
            "{}/customvision/{}/Training",
            endpoint.trim_end_matches('/'),
            api_version
        );
        Self::new_with_url(base_url, training_key)
    }

    pub fn new_with_url(base_url: String, training_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            training_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, ApiError> {
        let response = request
            .header(TRAINING_KEY_HEADER, &self.training_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl TrainingApi for TrainingClient {
    async fn create_project(&self, name: &str) -> Result<Project, ApiError> {
        let log = DEFAULT.new(o!("function" => "TrainingClient::create_project"));
        debug!(log, "request"; "name" => name);
        let request = self
            .client
            .post(self.url("/projects"))
            .query(&[("name", name)]);
        self.send(request).await
    }

    async fn create_tag(&self, project_id: Uuid, name: &str) -> Result<Tag, ApiError> {
        let log = DEFAULT.new(o!("function" => "TrainingClient::create_tag"));
        debug!(log, "request"; "project_id" => %project_id, "name" => name);
        let request = self
            .client
            .post(self.url(&format!("/projects/{}/tags", project_id)))
            .query(&[("name", name)]);
        self.send(request).await
    }

    async fn create_images_from_data(
        &self,
        project_id: Uuid,
        data: Vec<u8>,
        tag_ids: &[Uuid],
    ) -> Result<ImageCreateSummary, ApiError> {
        let log = DEFAULT.new(o!("function" => "TrainingClient::create_images_from_data"));
        debug!(log, "request";
            "project_id" => %project_id,
            "bytes" => data.len(),
            "tags" => tag_ids.len(),
        );
        let tag_ids = tag_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let request = self
            .client
            .post(self.url(&format!("/projects/{}/images", project_id)))
            .query(&[("tagIds", tag_ids)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(data);
        self.send(request).await
    }

    async fn train_project(&self, project_id: Uuid) -> Result<Iteration, ApiError> {
        let log = DEFAULT.new(o!("function" => "TrainingClient::train_project"));
        debug!(log, "request"; "project_id" => %project_id);
        let request = self
            .client
            .post(self.url(&format!("/projects/{}/train", project_id)));
        self.send(request).await
    }

    async fn get_iteration(
        &self,
        project_id: Uuid,
        iteration_id: Uuid,
    ) -> Result<Iteration, ApiError> {
        let log = DEFAULT.new(o!("function" => "TrainingClient::get_iteration"));
        debug!(log, "request";
            "project_id" => %project_id,
            "iteration_id" => %iteration_id,
        );
        let request = self.client.get(self.url(&format!(
            "/projects/{}/iterations/{}",
            project_id, iteration_id
        )));
        self.send(request).await
    }

    async fn update_iteration(
        &self,
        project_id: Uuid,
        iteration_id: Uuid,
        iteration: &Iteration,
    ) -> Result<Iteration, ApiError> {
        let log = DEFAULT.new(o!("function" => "TrainingClient::update_iteration"));
        debug!(log, "request";
            "project_id" => %project_id,
            "iteration_id" => %iteration_id,
            "is_default" => iteration.is_default,
        );
        let request = self
            .client
            .patch(self.url(&format!(
                "/projects/{}/iterations/{}",
                project_id, iteration_id
            )))
            .json(iteration);
        self.send(request).await
    }
}
