use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Failure of a single call to a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Parse(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(
        "Invalid path - please make sure to provide a valid path to a zip file: {}",
        .0.display()
    )]
    InvalidPath(PathBuf),
    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid zip file: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Cannot read entry {name}: {source}")]
    Entry {
        name: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("Unable to create new tag: {label}: {source}")]
    Create { label: String, source: ApiError },
    #[error("Tag id {id} for {label} is already used by {existing}")]
    DuplicateId {
        label: String,
        id: Uuid,
        existing: String,
    },
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("Unable to upload image: {name}: {source}")]
    Api { name: String, source: ApiError },
    #[error("Unable to upload image: {name}: service rejected it ({status})")]
    Rejected { name: String, status: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainingError {
    #[error("Unable to start training: {0}")]
    Train(ApiError),
    #[error("Unable to poll iteration {iteration_id}: {source}")]
    Poll { iteration_id: Uuid, source: ApiError },
    #[error("Unable to make iteration {iteration_id} the default: {source}")]
    Publish { iteration_id: Uuid, source: ApiError },
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Cannot read test image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Prediction request failed: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Unexpected end of input while reading {0}")]
    Eof(&'static str),
    #[error("Cannot read {what}: {source}")]
    Io {
        what: &'static str,
        source: std::io::Error,
    },
}

/// Conditions that end the run immediately.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(
        "Unable to create project - please make sure to provide a valid Custom Vision Service key: {0}"
    )]
    CreateProject(ApiError),
    #[error(transparent)]
    Input(#[from] InputError),
}
