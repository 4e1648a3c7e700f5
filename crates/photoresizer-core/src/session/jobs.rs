use tracing::warn;

use crate::error::{ResizerError, Result};
use crate::io::gallery;
use crate::reducer::{Effect, Outcome, RenderJob};
use crate::state::ImageSource;
use crate::transcode::{CancelToken, TranscodeRequest};

use super::{JobToken, Services};

/// Sent from a job thread back to the session.
pub(super) struct Completion {
    pub token: JobToken,
    pub outcome: Outcome,
}

pub(super) fn run(services: &Services, effect: Effect, cancel: &CancelToken) -> Outcome {
    let result = match effect {
        Effect::Probe { source } => {
            let info = services.prober.probe(&source);
            Ok(Outcome::Probed { source, info })
        }
        Effect::Compress(job) => compress(services, &job, cancel),
        Effect::Save(job) => save(services, &job, cancel),
    };
    result.unwrap_or_else(|e| {
        warn!(error = %e, "Background job failed");
        Outcome::Failed {
            message: e.user_message(),
        }
    })
}

fn compress(services: &Services, job: &RenderJob, cancel: &CancelToken) -> Result<Outcome> {
    let request = TranscodeRequest::preview(
        job.source.path(),
        &services.config.scratch_dir,
        job.width,
        job.height,
        job.format,
        services.config.preview_quality,
    );
    let output = ImageSource::new(services.transcoder.transcode(&request, cancel)?);
    let info = services.prober.probe(&output);
    Ok(Outcome::Compressed { output, info })
}

fn save(services: &Services, job: &RenderJob, cancel: &CancelToken) -> Result<Outcome> {
    let config = &services.config;
    let temp = config
        .scratch_dir
        .join(format!("final.{}", job.format.extension()));
    let request = TranscodeRequest::final_render(
        job.source.path(),
        &temp,
        job.width,
        job.height,
        job.quality,
        job.format,
    );
    let rendered = services.transcoder.transcode(&request, cancel)?;
    if cancel.is_cancelled() {
        return Err(ResizerError::Cancelled);
    }

    let base_name = format!("{}{}", job.source.stem(), config.name_suffix);
    let entry = gallery::persist(services.store.as_ref(), &rendered, &base_name, job.format)
        .map_err(|e| {
            warn!(error = %e, "Gallery write failed");
            match e {
                ResizerError::Gallery(message) => ResizerError::Gallery(message),
                other => ResizerError::Gallery(other.to_string()),
            }
        })?;
    let info = services.prober.probe(&entry.source);
    Ok(Outcome::Saved { entry, info })
}
