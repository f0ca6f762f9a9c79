pub mod cli;
pub mod config;
pub mod custom_vision;
pub mod dataset;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod poll;
pub mod prediction;
pub mod report;
pub mod tags;
pub mod training;
pub mod upload;

pub use cli::Cli;

use cli::Prompter;
use custom_vision::TrainingClient;
use errors::FatalError;
use logging::*;
use prediction::PredictionClient;
use report::RunReport;
use std::io::{BufRead, Write};

/// Resolves the inputs, then creates, fills, trains and tests a project.
pub async fn run<R: BufRead, W: Write>(
    cli: Cli,
    prompter: &mut Prompter<R, W>,
) -> Result<RunReport, FatalError> {
    let log = DEFAULT.new(o!("function" => "run"));

    let settings = cli.resolve(prompter)?;
    info!(log, "settings";
        "endpoint" => &settings.endpoint,
        "api_version" => &settings.api_version,
        "archive" => %settings.run.archive_path.display(),
        "poll_interval" => ?settings.run.poll_interval,
    );

    let api = TrainingClient::new(
        &settings.endpoint,
        &settings.api_version,
        settings.training_key.clone(),
    );
    let predictor = PredictionClient::new();
    pipeline::run(&api, &predictor, &settings.run).await
}
