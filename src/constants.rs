//! Tunable numeric constants for quality scoring, feature extraction, and the
//! explanation rule engine.
//!
//! These values are empirically chosen operating points, not derived
//! quantities. They are collected here so retuning against a new reference
//! dataset touches one file.

/// Minimum accepted width/height of an uploaded image, in pixels.
pub const MIN_DIMENSION: u32 = 50;

/// Maximum accepted width/height of an uploaded image, in pixels.
pub const MAX_DIMENSION: u32 = 10_000;

/// Default upload size cap in bytes (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Default model input edge length in pixels.
pub const DEFAULT_TARGET_SIZE: u32 = 224;

/// Default confidence threshold on the classifier's 0-100 scale.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 60.0;

/// Default minimum number of textual reasons per explanation.
pub const DEFAULT_MIN_REASONS: usize = 3;

/// Maximum number of textual reasons per explanation.
pub const MAX_REASONS: usize = 5;

// Quality assessment (Laplacian variance sharpness + glare heuristic).

/// Laplacian variance at or above this maps to a sharpness score of 1.0.
/// Typical values: <100 blurry, 100-500 acceptable, >500 sharp.
pub const SHARPNESS_VARIANCE_NORM: f64 = 500.0;

/// Luminance above which a pixel counts as "very bright" for glare detection.
pub const GLARE_LUMA_THRESHOLD: u8 = 240;

/// Glare requires more than this fraction of very bright pixels.
pub const GLARE_BRIGHT_RATIO: f64 = 0.05;

/// Glare also requires the mean luminance to exceed this value.
pub const GLARE_MEAN_BRIGHTNESS: f64 = 180.0;

/// Multiplier applied to the quality score when glare is detected.
pub const GLARE_QUALITY_PENALTY: f64 = 0.8;

// Pixel-level corrections.

/// CLAHE clip limit for lighting normalization.
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;

/// CLAHE local tile grid size (grid x grid tiles).
pub const CLAHE_TILE_GRID: u32 = 8;

/// Bilateral filter neighborhood diameter in pixels.
pub const BILATERAL_DIAMETER: u32 = 9;

/// Bilateral filter sigma in color space (intensity units).
pub const BILATERAL_SIGMA_COLOR: f32 = 75.0;

/// Bilateral filter sigma in coordinate space (pixels).
pub const BILATERAL_SIGMA_SPACE: f32 = 75.0;

/// Center-crop ratio used by the product cropper.
pub const PRODUCT_CROP_RATIO: f64 = 0.8;

// Tensor normalization (ImageNet statistics).

/// Per-channel RGB means for standard normalization, in [0,1] scale.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel RGB standard deviations for standard normalization.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

// Feature extraction.

/// Laplacian variance normalizer for logo clarity and edge sharpness.
pub const EDGE_SHARPNESS_VARIANCE_NORM: f64 = 1000.0;

/// Laplacian variance normalizer for print texture. Deliberately different
/// from the edge sharpness normalizer to give the texture score a distinct
/// sensitivity.
pub const PRINT_TEXTURE_VARIANCE_NORM: f64 = 800.0;

/// Quadrant mean-color variance normalizer for color consistency.
pub const COLOR_VARIANCE_NORM: f64 = 5000.0;

/// Canny low threshold for text alignment edge detection.
pub const CANNY_LOW_THRESHOLD: f32 = 50.0;

/// Canny high threshold for text alignment edge detection.
pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;

/// Accumulator vote threshold for probabilistic line detection.
pub const HOUGH_VOTE_THRESHOLD: u32 = 50;

/// Minimum accepted line segment length in pixels.
pub const HOUGH_MIN_LINE_LENGTH: f64 = 30.0;

/// Maximum gap in pixels bridged within one line segment.
pub const HOUGH_MAX_LINE_GAP: u32 = 10;

/// Angular tolerance (radians) around horizontal/vertical for a line to
/// count as aligned.
pub const ALIGNMENT_ANGLE_TOLERANCE: f64 = 0.2;

/// Neutral text alignment score reported when no lines are detected.
pub const NEUTRAL_ALIGNMENT_SCORE: f32 = 0.5;

// Explanation rule thresholds, keyed by predicted label.

/// Fake branch: logo clarity below this triggers the blurry-logo reason.
pub const FAKE_LOGO_CLARITY_MAX: f32 = 0.6;

/// Fake branch: text alignment below this triggers the alignment reason.
pub const FAKE_TEXT_ALIGNMENT_MAX: f32 = 0.7;

/// Fake branch: color deviation above this triggers the color reason.
pub const FAKE_COLOR_DEVIATION_MIN: f32 = 0.3;

/// Fake branch: print texture below this triggers the print quality reason.
pub const FAKE_PRINT_TEXTURE_MAX: f32 = 0.65;

/// Fake branch: edge sharpness below this triggers the soft-edges reason.
pub const FAKE_EDGE_SHARPNESS_MAX: f32 = 0.5;

/// Original branch: logo clarity above this triggers the clear-logo reason.
pub const ORIGINAL_LOGO_CLARITY_MIN: f32 = 0.7;

/// Original branch: text alignment above this triggers the alignment reason.
pub const ORIGINAL_TEXT_ALIGNMENT_MIN: f32 = 0.7;

/// Original branch: color consistency above this triggers the color reason.
pub const ORIGINAL_COLOR_CONSISTENCY_MIN: f32 = 0.7;

/// Original branch: print texture above this triggers the print reason.
pub const ORIGINAL_PRINT_TEXTURE_MIN: f32 = 0.7;

/// Original branch: edge sharpness above this triggers the edges reason.
pub const ORIGINAL_EDGE_SHARPNESS_MIN: f32 = 0.6;

/// Confidence above which the strong summary sentence is appended.
pub const HIGH_CONFIDENCE_TIER: f32 = 85.0;

/// Fake branch only: confidence above which the moderate summary applies.
pub const MODERATE_CONFIDENCE_TIER: f32 = 70.0;

// Reference comparison baseline ("typical authentic" feature vector).

/// Reference logo clarity score.
pub const REFERENCE_LOGO_CLARITY: f32 = 0.75;

/// Reference text alignment score.
pub const REFERENCE_TEXT_ALIGNMENT: f32 = 0.80;

/// Reference color consistency score.
pub const REFERENCE_COLOR_CONSISTENCY: f32 = 0.75;

/// Reference print texture score.
pub const REFERENCE_PRINT_TEXTURE: f32 = 0.70;

/// Reference edge sharpness score.
pub const REFERENCE_EDGE_SHARPNESS: f32 = 0.65;

/// Default heatmap overlay blend weight.
pub const DEFAULT_OVERLAY_ALPHA: f32 = 0.4;
