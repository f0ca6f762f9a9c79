//! In-memory `TrainingApi` that records every call.

use super::TrainingApi;
use super::models::{ImageCreateResult, ImageCreateSummary, Iteration, Project, Tag};
use crate::errors::ApiError;
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProject(String),
    CreateTag(String),
    Upload { data: Vec<u8>, tag_ids: Vec<Uuid> },
    Train,
    GetIteration(Uuid),
    UpdateIteration { iteration_id: Uuid, is_default: bool },
}

pub struct FakeTrainingApi {
    pub project_id: Uuid,
    pub iteration_id: Uuid,
    calls: Mutex<Vec<Call>>,
    statuses: Mutex<VecDeque<String>>,
    failing_tags: HashSet<String>,
    fixed_tag_id: Option<Uuid>,
    rejected_uploads: HashSet<Vec<u8>>,
    fail_project: bool,
    fail_train: bool,
    fail_poll: bool,
    fail_update: bool,
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "boom".to_string(),
    }
}

impl FakeTrainingApi {
    /// `statuses` are returned in order: the first by `train_project`, the
    /// rest by `get_iteration`. The last one repeats.
    pub fn new(statuses: &[&str]) -> Self {
        Self {
            project_id: Uuid::new_v4(),
            iteration_id: Uuid::new_v4(),
            calls: Mutex::new(Vec::new()),
            statuses: Mutex::new(statuses.iter().map(|s| s.to_string()).collect()),
            failing_tags: HashSet::new(),
            fixed_tag_id: None,
            rejected_uploads: HashSet::new(),
            fail_project: false,
            fail_train: false,
            fail_poll: false,
            fail_update: false,
        }
    }

    pub fn failing_tag(mut self, name: &str) -> Self {
        self.failing_tags.insert(name.to_string());
        self
    }

    /// Every created tag gets the same id.
    pub fn fixed_tag_id(mut self, id: Uuid) -> Self {
        self.fixed_tag_id = Some(id);
        self
    }

    pub fn rejecting_upload(mut self, data: &[u8]) -> Self {
        self.rejected_uploads.insert(data.to_vec());
        self
    }

    pub fn failing_project(mut self) -> Self {
        self.fail_project = true;
        self
    }

    pub fn failing_train(mut self) -> Self {
        self.fail_train = true;
        self
    }

    pub fn failing_poll(mut self) -> Self {
        self.fail_poll = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_iteration(&self) -> Iteration {
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses.front().cloned().unwrap_or_else(|| "Completed".to_string())
        };
        Iteration {
            id: self.iteration_id,
            name: "Iteration 1".to_string(),
            status,
            is_default: false,
            project_id: Some(self.project_id),
            created: None,
            last_modified: None,
            trained_at: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[async_trait]
impl TrainingApi for FakeTrainingApi {
    async fn create_project(&self, name: &str) -> Result<Project, ApiError> {
        self.record(Call::CreateProject(name.to_string()));
        if self.fail_project {
            return Err(server_error());
        }
        Ok(Project {
            id: self.project_id,
            name: name.to_string(),
            description: None,
        })
    }

    async fn create_tag(&self, _project_id: Uuid, name: &str) -> Result<Tag, ApiError> {
        self.record(Call::CreateTag(name.to_string()));
        if self.failing_tags.contains(name) {
            return Err(server_error());
        }
        Ok(Tag {
            id: self.fixed_tag_id.unwrap_or_else(Uuid::new_v4),
            name: name.to_string(),
            description: None,
            image_count: None,
        })
    }

    async fn create_images_from_data(
        &self,
        _project_id: Uuid,
        data: Vec<u8>,
        tag_ids: &[Uuid],
    ) -> Result<ImageCreateSummary, ApiError> {
        let rejected = self.rejected_uploads.contains(&data);
        self.record(Call::Upload {
            data,
            tag_ids: tag_ids.to_vec(),
        });
        let status = if rejected { "ErrorImageFormat" } else { "OK" };
        Ok(ImageCreateSummary {
            is_batch_successful: !rejected,
            images: vec![ImageCreateResult {
                source_url: None,
                status: status.to_string(),
                image: None,
            }],
        })
    }

    async fn train_project(&self, _project_id: Uuid) -> Result<Iteration, ApiError> {
        self.record(Call::Train);
        if self.fail_train {
            return Err(server_error());
        }
        Ok(self.next_iteration())
    }

    async fn get_iteration(
        &self,
        _project_id: Uuid,
        iteration_id: Uuid,
    ) -> Result<Iteration, ApiError> {
        self.record(Call::GetIteration(iteration_id));
        if self.fail_poll {
            return Err(server_error());
        }
        Ok(self.next_iteration())
    }

    async fn update_iteration(
        &self,
        _project_id: Uuid,
        iteration_id: Uuid,
        iteration: &Iteration,
    ) -> Result<Iteration, ApiError> {
        self.record(Call::UpdateIteration {
            iteration_id,
            is_default: iteration.is_default,
        });
        if self.fail_update {
            return Err(server_error());
        }
        Ok(iteration.clone())
    }
}
