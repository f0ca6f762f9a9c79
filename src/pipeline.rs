use crate::custom_vision::TrainingApi;
use crate::dataset::{self, DatasetReader};
use crate::errors::FatalError;
use crate::logging::*;
use crate::prediction::{PredictionClient, PredictionRequest};
use crate::report::RunReport;
use crate::tags::TagRegistry;
use crate::training::TrainingOrchestrator;
use crate::upload::upload_all;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    TaggingAndUploading,
    Training,
    Predicting,
    Done,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Created => "created",
            Stage::TaggingAndUploading => "tagging_and_uploading",
            Stage::Training => "training",
            Stage::Predicting => "predicting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct RunInputs {
    pub archive_path: PathBuf,
    pub prediction: PredictionRequest,
    pub poll_interval: Duration,
}

/// Runs every step in order.
///
/// Only an unusable archive or a failed project creation stops the run;
/// those are checked before anything else touches the service. All later
/// failures end up in the report and the run moves on.
pub async fn run<A>(
    api: &A,
    predictor: &PredictionClient,
    inputs: &RunInputs,
) -> Result<RunReport, FatalError>
where
    A: TrainingApi + ?Sized,
{
    let log = DEFAULT.new(o!("function" => "pipeline::run"));
    let enter = |stage: Stage| info!(log, "stage"; "stage" => %stage);

    let archive_path = dataset::resolve_archive_path(&inputs.archive_path)?;
    let project_name = dataset::project_name(&archive_path)?;
    let reader = DatasetReader::open(&archive_path)?;
    info!(log, "archive opened";
        "path" => %archive_path.display(),
        "entries" => reader.entry_count(),
    );

    let project = api
        .create_project(&project_name)
        .await
        .map_err(FatalError::CreateProject)?;
    println!("Created new project: {}", project_name);
    enter(Stage::Created);

    enter(Stage::TaggingAndUploading);
    let mut registry = TagRegistry::new(project.id);
    let uploads = upload_all(api, project.id, &mut registry, reader).await;

    enter(Stage::Training);
    println!("Training new project: {}", project_name);
    let training = TrainingOrchestrator::new(api, project.id, inputs.poll_interval)
        .run()
        .await;
    if let Err(err) = &training {
        warn!(log, "training failed"; "error" => %err);
        println!("Unable to train project, please train manually. ({})", err);
    }

    enter(Stage::Predicting);
    let prediction = predictor.predict(&inputs.prediction).await;
    match &prediction {
        Ok(body) => println!("{}", body),
        Err(err) => {
            warn!(log, "prediction failed"; "error" => %err);
            println!(
                "Unable to obtain prediction, please try again manually. ({})",
                err
            );
        }
    }

    enter(Stage::Done);
    Ok(RunReport {
        project,
        tags: registry.created().to_vec(),
        tag_failures: registry.failures().to_vec(),
        uploads,
        training,
        prediction,
    })
}
