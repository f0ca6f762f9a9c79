pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod fake;

use crate::errors::ApiError;
use async_trait::async_trait;
use models::{ImageCreateSummary, Iteration, Project, Tag};
use uuid::Uuid;

pub use client::TrainingClient;

/// Operations of the hosted training service used by a run.
#[async_trait]
pub trait TrainingApi: Send + Sync {
    async fn create_project(&self, name: &str) -> Result<Project, ApiError>;

    async fn create_tag(&self, project_id: Uuid, name: &str) -> Result<Tag, ApiError>;

    async fn create_images_from_data(
        &self,
        project_id: Uuid,
        data: Vec<u8>,
        tag_ids: &[Uuid],
    ) -> Result<ImageCreateSummary, ApiError>;

    async fn train_project(&self, project_id: Uuid) -> Result<Iteration, ApiError>;

    async fn get_iteration(
        &self,
        project_id: Uuid,
        iteration_id: Uuid,
    ) -> Result<Iteration, ApiError>;

    async fn update_iteration(
        &self,
        project_id: Uuid,
        iteration_id: Uuid,
        iteration: &Iteration,
    ) -> Result<Iteration, ApiError>;
}
