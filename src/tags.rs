use crate::custom_vision::TrainingApi;
use crate::errors::TagError;
use crate::logging::*;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    pub label: String,
    pub id: Uuid,
}

/// Label to remote tag id mapping for one project.
///
/// Each label is sent to the service at most once. A failed creation is
/// remembered and returned again for later images of the same label.
pub struct TagRegistry {
    project_id: Uuid,
    ids: HashMap<String, Uuid>,
    failed: HashMap<String, usize>,
    failures: Vec<TagError>,
    created: Vec<CreatedTag>,
}

impl TagRegistry {
    pub fn new(project_id: Uuid) -> Self {
        Self {
            project_id,
            ids: HashMap::new(),
            failed: HashMap::new(),
            failures: Vec::new(),
            created: Vec::new(),
        }
    }

    pub async fn resolve<A>(&mut self, api: &A, label: &str) -> Result<Uuid, TagError>
    where
        A: TrainingApi + ?Sized,
    {
        if let Some(id) = self.ids.get(label) {
            return Ok(*id);
        }
        if let Some(&index) = self.failed.get(label) {
            return Err(self.failures[index].clone());
        }

        let log = DEFAULT.new(o!(
            "function" => "TagRegistry::resolve",
            "label" => label.to_string(),
        ));

        let result = match api.create_tag(self.project_id, label).await {
            Ok(tag) => self.bind(label, tag.id),
            Err(source) => Err(TagError::Create {
                label: label.to_string(),
                source,
            }),
        };

        match &result {
            Ok(id) => {
                info!(log, "created tag"; "id" => %id);
                println!("Created new tag: {}", label);
            }
            Err(err) => {
                warn!(log, "tag creation failed"; "error" => %err);
                println!("{}", err);
                self.failed.insert(label.to_string(), self.failures.len());
                self.failures.push(err.clone());
            }
        }
        result
    }

    fn bind(&mut self, label: &str, id: Uuid) -> Result<Uuid, TagError> {
        if let Some(existing) = self.created.iter().find(|t| t.id == id) {
            return Err(TagError::DuplicateId {
                label: label.to_string(),
                id,
                existing: existing.label.clone(),
            });
        }
        self.ids.insert(label.to_string(), id);
        self.created.push(CreatedTag {
            label: label.to_string(),
            id,
        });
        Ok(id)
    }

    pub fn get(&self, label: &str) -> Option<Uuid> {
        self.ids.get(label).copied()
    }

    /// Tags created so far, in creation order.
    pub fn created(&self) -> &[CreatedTag] {
        &self.created
    }

    /// Failed creations, in the order the labels were first seen.
    pub fn failures(&self) -> &[TagError] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
