use crate::custom_vision::models::Project;
use crate::errors::{PredictionError, TagError, TrainingError};
use crate::tags::CreatedTag;
use crate::training::TrainingOutcome;
use crate::upload::UploadSummary;
use std::fmt::{self, Display};

/// Outcome of every step of one run.
#[derive(Debug)]
pub struct RunReport {
    pub project: Project,
    pub tags: Vec<CreatedTag>,
    pub tag_failures: Vec<TagError>,
    pub uploads: UploadSummary,
    pub training: Result<TrainingOutcome, TrainingError>,
    pub prediction: Result<String, PredictionError>,
}

impl RunReport {
    /// True when no step reported a failure.
    pub fn is_clean(&self) -> bool {
        self.tag_failures.is_empty()
            && self.uploads.failures.is_empty()
            && self.training.is_ok()
            && self.prediction.is_ok()
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project:    {} ({})", self.project.name, self.project.id)?;
        writeln!(
            f,
            "Tags:       {} created, {} failed",
            self.tags.len(),
            self.tag_failures.len()
        )?;
        writeln!(
            f,
            "Images:     {} uploaded ({} untagged), {} failed",
            self.uploads.uploaded.len(),
            self.uploads.untagged.len(),
            self.uploads.failures.len()
        )?;
        match &self.training {
            Ok(outcome) => writeln!(
                f,
                "Training:   iteration {} {} (default: {})",
                outcome.iteration.id, outcome.iteration.status, outcome.iteration.is_default
            )?,
            Err(err) => writeln!(f, "Training:   failed: {}", err)?,
        }
        match &self.prediction {
            Ok(_) => write!(f, "Prediction: ok"),
            Err(err) => write!(f, "Prediction: failed: {}", err),
        }
    }
}
