//! Pure state transitions.
//!
//! `reduce` turns an intent into the next snapshot plus, for the intents that
//! need I/O, a description of the background work to run. `complete` folds
//! the result of that work back into whatever snapshot is current when it
//! finishes. Neither function touches the file system or spawns anything.

use crate::consts::{MAX_QUALITY, MIN_QUALITY};
use crate::error::ResizerError;
use crate::estimate::estimate_size;
use crate::format::OutputFormat;
use crate::intent::Intent;
use crate::io::gallery::GalleryEntry;
use crate::io::probe::ImageInfo;
use crate::state::{EditState, ImageSource};

/// Background work requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Probe { source: ImageSource },
    Compress(RenderJob),
    Save(RenderJob),
}

/// Settings captured at dispatch time for one transcode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderJob {
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub format: OutputFormat,
}

impl Effect {
    /// Whether this effect runs the transcoder (and so holds `is_processing`).
    pub fn is_transcode(&self) -> bool {
        matches!(self, Self::Compress(_) | Self::Save(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Probe { .. } => "probe",
            Self::Compress(_) => "compress",
            Self::Save(_) => "save",
        }
    }
}

/// Result of a finished background job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Probed { source: ImageSource, info: ImageInfo },
    Compressed { output: ImageSource, info: ImageInfo },
    Saved { entry: GalleryEntry, info: ImageInfo },
    Failed { message: String },
}

/// Next snapshot for one intent.
#[derive(Debug)]
pub struct Transition {
    pub state: EditState,
    pub effect: Option<Effect>,
    /// Set when the intent's precondition did not hold. The snapshot may
    /// still change (to carry an error message) but no effect is scheduled.
    pub rejection: Option<ResizerError>,
}

impl Transition {
    fn applied(state: EditState) -> Self {
        Self {
            state,
            effect: None,
            rejection: None,
        }
    }

    fn scheduled(state: EditState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
            rejection: None,
        }
    }

    fn rejected(state: EditState, reason: ResizerError) -> Self {
        Self {
            state,
            effect: None,
            rejection: Some(reason),
        }
    }
}

pub fn reduce(state: &EditState, intent: Intent) -> Transition {
    match intent {
        Intent::PickImage(source) => {
            let next = EditState {
                image_source: Some(source.clone()),
                original_width: None,
                original_height: None,
                original_size: None,
                compressed_source: None,
                compressed_width: None,
                compressed_height: None,
                compressed_size: None,
                is_processing: false,
                error_message: None,
                ..state.clone()
            };
            Transition::scheduled(with_derived(next), Effect::Probe { source })
        }
        Intent::SetWidth(width) => {
            let width = clamp_dimension(width, state.original_width);
            Transition::applied(with_derived(EditState {
                target_width: width,
                ..state.clone()
            }))
        }
        Intent::SetHeight(height) => {
            let height = clamp_dimension(height, state.original_height);
            Transition::applied(with_derived(EditState {
                target_height: height,
                ..state.clone()
            }))
        }
        Intent::SetQuality(quality) => Transition::applied(with_derived(EditState {
            quality: quality.clamp(MIN_QUALITY, MAX_QUALITY),
            ..state.clone()
        })),
        Intent::SetFormat(format) => Transition::applied(with_derived(EditState {
            format,
            ..state.clone()
        })),
        Intent::Compress(source) => {
            if state.is_processing {
                return Transition::rejected(state.clone(), ResizerError::Busy);
            }
            if state.image_source.is_none() {
                return reject_with_message(state, ResizerError::NoImageSelected);
            }
            let job = render_job(state, source);
            Transition::scheduled(
                EditState {
                    is_processing: true,
                    ..state.clone()
                },
                Effect::Compress(job),
            )
        }
        Intent::SaveToPhoto => {
            if state.is_processing {
                return Transition::rejected(state.clone(), ResizerError::Busy);
            }
            let Some(source) = state.image_source.clone() else {
                return reject_with_message(state, ResizerError::NoImageSelected);
            };
            if state.compressed_source.is_none() {
                return reject_with_message(state, ResizerError::NoCompressedImage);
            }
            let job = render_job(state, source);
            Transition::scheduled(
                EditState {
                    is_processing: true,
                    ..state.clone()
                },
                Effect::Save(job),
            )
        }
        Intent::ClearError => Transition::applied(EditState {
            error_message: None,
            ..state.clone()
        }),
        Intent::Reset => Transition::applied(EditState::default()),
    }
}

/// Fold a finished job into the current snapshot.
///
/// Only result fields are written, so settings the user changed while the
/// job ran survive. A failure leaves every result field as it was.
pub fn complete(state: &EditState, outcome: Outcome) -> EditState {
    match outcome {
        Outcome::Probed { source, info } => {
            if state.image_source.as_ref() != Some(&source) {
                return state.clone();
            }
            let original_width = info.known_width();
            let original_height = info.known_height();
            with_derived(EditState {
                original_width,
                original_height,
                original_size: info.known_size(),
                target_width: original_width.unwrap_or(state.target_width),
                target_height: original_height.unwrap_or(state.target_height),
                ..state.clone()
            })
        }
        Outcome::Compressed { output, info } => with_derived(EditState {
            is_processing: false,
            compressed_source: Some(output),
            compressed_width: info.known_width(),
            compressed_height: info.known_height(),
            compressed_size: info.known_size(),
            ..state.clone()
        }),
        Outcome::Saved { entry, info } => with_derived(EditState {
            is_processing: false,
            compressed_source: Some(entry.source),
            compressed_width: info.known_width(),
            compressed_height: info.known_height(),
            compressed_size: info.known_size(),
            ..state.clone()
        }),
        Outcome::Failed { message } => EditState {
            is_processing: false,
            error_message: Some(message),
            ..state.clone()
        },
    }
}

fn render_job(state: &EditState, source: ImageSource) -> RenderJob {
    RenderJob {
        source,
        width: state.target_width,
        height: state.target_height,
        quality: state.quality,
        format: state.format,
    }
}

fn reject_with_message(state: &EditState, reason: ResizerError) -> Transition {
    let next = EditState {
        error_message: Some(reason.user_message()),
        ..state.clone()
    };
    Transition::rejected(next, reason)
}

/// No upscaling past a known original, and never below one pixel.
fn clamp_dimension(requested: u32, original: Option<u32>) -> u32 {
    let requested = requested.max(1);
    original.map_or(requested, |max| requested.min(max))
}

/// Recompute `reduced_size` and `estimated_size` from the other fields.
fn with_derived(state: EditState) -> EditState {
    let reduced_size = match (state.original_size, state.compressed_size) {
        (Some(original), Some(compressed)) => Some(original as i64 - compressed as i64),
        _ => None,
    };
    let estimated_size = state.image_source.as_ref().map(|_| {
        estimate_size(
            state.original_size.unwrap_or(0),
            state.original_width.unwrap_or(0),
            state.original_height.unwrap_or(0),
            state.target_width,
            state.target_height,
            state.quality,
            state.format,
        )
    });
    EditState {
        reduced_size,
        estimated_size,
        ..state
    }
}
