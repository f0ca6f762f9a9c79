use crate::custom_vision::TrainingApi;
use crate::dataset::LabeledImage;
use crate::errors::{ArchiveError, UploadError};
use crate::logging::*;
use crate::tags::TagRegistry;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct UploadSummary {
    /// Archive paths of the images the service accepted.
    pub uploaded: Vec<String>,
    /// Accepted images sent without a tag because their label failed.
    pub untagged: Vec<String>,
    pub failures: Vec<UploadError>,
}

struct Uploaded {
    path: String,
    tagged: bool,
}

impl UploadSummary {
    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failures.len()
    }
}

/// Uploads every image one at a time, tagged with its label.
///
/// Failures are collected per entry and never stop the loop. Images whose
/// tag could not be created are still sent, with no tag.
pub async fn upload_all<A, I>(
    api: &A,
    project_id: Uuid,
    registry: &mut TagRegistry,
    images: I,
) -> UploadSummary
where
    A: TrainingApi + ?Sized,
    I: IntoIterator<Item = Result<LabeledImage, ArchiveError>>,
{
    let log = DEFAULT.new(o!(
        "function" => "upload::upload_all",
        "project_id" => project_id.to_string(),
    ));
    let mut summary = UploadSummary::default();

    for item in images {
        match upload_one(api, project_id, registry, item).await {
            Ok(Uploaded { path, tagged }) => {
                debug!(log, "uploaded"; "path" => &path, "tagged" => tagged);
                if !tagged {
                    summary.untagged.push(path.clone());
                }
                summary.uploaded.push(path);
            }
            Err(err) => {
                warn!(log, "upload failed"; "error" => %err);
                println!("{}", err);
                summary.failures.push(err);
            }
        }
    }

    info!(log, "uploads finished";
        "uploaded" => summary.uploaded.len(),
        "untagged" => summary.untagged.len(),
        "failed" => summary.failures.len(),
    );
    summary
}

async fn upload_one<A>(
    api: &A,
    project_id: Uuid,
    registry: &mut TagRegistry,
    item: Result<LabeledImage, ArchiveError>,
) -> Result<Uploaded, UploadError>
where
    A: TrainingApi + ?Sized,
{
    let image = item?;
    // The registry keeps the tag failure for the report.
    let tag_ids = match registry.resolve(api, &image.label).await {
        Ok(id) => vec![id],
        Err(_) => Vec::new(),
    };

    let result = api
        .create_images_from_data(project_id, image.data, &tag_ids)
        .await
        .map_err(|source| UploadError::Api {
            name: image.path.clone(),
            source,
        })?;

    if !result.is_batch_successful {
        return Err(UploadError::Rejected {
            name: image.path,
            status: result.failure_status().unwrap_or("unknown").to_string(),
        });
    }

    println!("Uploaded new image: {}", image.name);
    Ok(Uploaded {
        path: image.path,
        tagged: !tag_ids.is_empty(),
    })
}
