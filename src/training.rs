use crate::custom_vision::TrainingApi;
use crate::custom_vision::models::Iteration;
use crate::errors::TrainingError;
use crate::logging::*;
use crate::poll::poll_until;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    /// The iteration as returned by the update call.
    pub iteration: Iteration,
    /// Number of status re-fetches after the initial train call.
    pub polls: u32,
}

/// Trains a project, waits for the iteration to leave `Training` and makes
/// it the default iteration.
pub struct TrainingOrchestrator<'a, A: ?Sized> {
    api: &'a A,
    project_id: Uuid,
    interval: Duration,
}

impl<'a, A> TrainingOrchestrator<'a, A>
where
    A: TrainingApi + ?Sized,
{
    pub fn new(api: &'a A, project_id: Uuid, interval: Duration) -> Self {
        Self {
            api,
            project_id,
            interval,
        }
    }

    pub async fn run(&self) -> Result<TrainingOutcome, TrainingError> {
        let log = DEFAULT.new(o!(
            "function" => "TrainingOrchestrator::run",
            "project_id" => self.project_id.to_string(),
        ));

        let started = self
            .api
            .train_project(self.project_id)
            .await
            .map_err(TrainingError::Train)?;
        let iteration_id = started.id;
        info!(log, "training started";
            "iteration_id" => %iteration_id,
            "status" => &started.status,
        );

        let (api, project_id) = (self.api, self.project_id);
        let mut polls = 0u32;
        let trained = poll_until(
            started,
            self.interval,
            || {
                polls += 1;
                api.get_iteration(project_id, iteration_id)
            },
            |iteration: &Iteration| !iteration.is_training(),
        )
        .await
        .map_err(|source| TrainingError::Poll {
            iteration_id,
            source,
        })?;

        info!(log, "training finished";
            "status" => &trained.status,
            "polls" => polls,
        );
        if trained.status != "Completed" {
            warn!(log, "publishing an iteration that did not complete";
                "status" => &trained.status,
            );
        }

        let mut iteration = trained;
        iteration.is_default = true;
        let iteration = self
            .api
            .update_iteration(self.project_id, iteration_id, &iteration)
            .await
            .map_err(|source| TrainingError::Publish {
                iteration_id,
                source,
            })?;
        info!(log, "iteration is now the default"; "iteration_id" => %iteration_id);

        Ok(TrainingOutcome { iteration, polls })
    }
}
