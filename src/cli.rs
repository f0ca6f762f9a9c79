use crate::config;
use crate::errors::InputError;
use crate::pipeline::RunInputs;
use crate::prediction::PredictionRequest;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

pub const KEY_LENGTH: usize = 32;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cvtrain")]
#[command(about = "Create, train and publish an image classification project from a zip of labeled images")]
#[command(version)]
pub struct Cli {
    /// Training key of the Custom Vision resource
    pub training_key: Option<String>,

    /// Zip file with one folder of images per tag
    pub zip_file_path: Option<PathBuf>,

    /// Prediction key of the Custom Vision resource
    pub prediction_key: Option<String>,

    /// Image sent to the prediction endpoint once training is done
    pub test_image_file_path: Option<PathBuf>,

    /// Prediction URL (image file variant) of the published model
    pub prediction_url: Option<String>,

    /// Training endpoint, overrides CUSTOM_VISION_ENDPOINT
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Interval between training status checks, e.g. "1s" or "500ms"
    #[arg(long, value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_wait: bool,
}

/// Everything a run needs once prompting is done.
#[derive(Debug, Clone)]
pub struct Settings {
    pub training_key: String,
    pub endpoint: String,
    pub api_version: String,
    pub run: RunInputs,
}

pub fn is_valid_key(value: &str) -> bool {
    !value.trim().is_empty() && value.len() == KEY_LENGTH
}

pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Asks on `output` and reads answers from `input` until one is accepted.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns `given` when it passes `valid`, otherwise prompts.
    pub fn ask(
        &mut self,
        what: &'static str,
        question: &str,
        given: Option<String>,
        valid: impl Fn(&str) -> bool,
    ) -> Result<String, InputError> {
        if let Some(value) = given
            && valid(&value)
        {
            return Ok(value);
        }

        loop {
            write!(self.output, "{}", question)
                .and_then(|_| self.output.flush())
                .map_err(|source| InputError::Io { what, source })?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|source| InputError::Io { what, source })?;
            if read == 0 {
                return Err(InputError::Eof(what));
            }

            let value = line.trim_end_matches(['\r', '\n']).to_string();
            if valid(&value) {
                writeln!(self.output).map_err(|source| InputError::Io { what, source })?;
                return Ok(value);
            }
        }
    }

    /// Blocks until a line (or end of input) is read.
    pub fn pause(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message).and_then(|_| self.output.flush());
        let mut line = String::new();
        let _ = self.input.read_line(&mut line);
    }
}

impl Cli {
    /// Fills in missing or invalid arguments by prompting, then applies
    /// configuration defaults.
    pub fn resolve<R: BufRead, W: Write>(
        self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Settings, InputError> {
        let training_key = prompter.ask(
            "training key",
            "Enter your training key: ",
            self.training_key,
            is_valid_key,
        )?;
        let zip_file_path = prompter.ask(
            "zip file path",
            "Enter the full path to the zip file containing your Custom Vision assets: ",
            self.zip_file_path.map(|p| p.to_string_lossy().into_owned()),
            is_present,
        )?;
        let prediction_key = prompter.ask(
            "prediction key",
            "Enter your prediction key: ",
            self.prediction_key,
            is_valid_key,
        )?;
        let test_image_file_path = prompter.ask(
            "test image path",
            "Enter the full path to the image to test with your Custom Vision Service: ",
            self.test_image_file_path
                .map(|p| p.to_string_lossy().into_owned()),
            is_present,
        )?;
        let prediction_url = prompter.ask(
            "prediction URL",
            "Enter the prediction URL from your trained Custom Vision Service model here: ",
            self.prediction_url,
            is_present,
        )?;

        Ok(Settings {
            training_key,
            endpoint: self.endpoint.unwrap_or_else(config::training_endpoint),
            api_version: config::api_version(),
            run: RunInputs {
                archive_path: PathBuf::from(zip_file_path),
                prediction: PredictionRequest {
                    prediction_key,
                    image_path: PathBuf::from(test_image_file_path),
                    url: prediction_url,
                },
                poll_interval: self.poll_interval.unwrap_or_else(config::poll_interval),
            },
        })
    }
}
