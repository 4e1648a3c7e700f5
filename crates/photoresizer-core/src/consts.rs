/// Target width of a fresh edit state, before any image has been probed.
pub const DEFAULT_TARGET_WIDTH: u32 = 1000;

/// Target height of a fresh edit state, before any image has been probed.
pub const DEFAULT_TARGET_HEIGHT: u32 = 1000;

/// User-facing quality of a fresh edit state (1-100 scale).
pub const DEFAULT_QUALITY: u8 = 80;

/// Lowest accepted user-facing quality.
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted user-facing quality.
pub const MAX_QUALITY: u8 = 100;

/// User-facing quality used for preview renders unless configured otherwise.
pub const DEFAULT_PREVIEW_QUALITY: u8 = 30;

/// Best value on the transcoder's inverted `-q:v` scale.
pub const EXTERNAL_QUALITY_BEST: u8 = 2;

/// Worst value on the transcoder's inverted `-q:v` scale.
pub const EXTERNAL_QUALITY_WORST: u8 = 31;

/// Extra size factor applied to WebP estimates relative to JPEG.
pub const WEBP_SIZE_FACTOR: f64 = 0.7;

/// Suffix appended to the source stem when naming saved images.
pub const DEFAULT_NAME_SUFFIX: &str = "_ReSized";

/// Stem used when the source has no usable file name.
pub const FALLBACK_STEM: &str = "image";

/// Default transcoder executable, resolved through `PATH`.
pub const DEFAULT_TOOL: &str = "ffmpeg";

/// How often a running transcoder child is checked for exit or cancellation.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 25;
