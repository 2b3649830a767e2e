pub mod analysis;
pub mod detection;
pub mod property;

pub(crate) const DEFAULT_FRAME_WIDTH: f32 = 640.0;
pub(crate) const DEFAULT_FRAME_HEIGHT: f32 = 480.0;

// --- Precise position (pinhole camera) ---
/// Assumed horizontal field of view of a phone camera, in degrees.
pub(crate) const HORIZONTAL_FOV_DEGREES: f32 = 60.0;
pub(crate) const MIN_ESTIMATED_DISTANCE_M: f32 = 0.5;
pub(crate) const MAX_ESTIMATED_DISTANCE_M: f32 = 100.0;
/// Boxes shorter than this (in pixels) cannot carry a distance estimate.
pub(crate) const MIN_PIXEL_HEIGHT: f32 = 1e-3;

// --- Free path ---
pub(crate) const INTERVAL_MERGE_TOLERANCE: f32 = 0.01;
pub(crate) const MIN_GAP_WIDTH: f32 = 0.05;
pub(crate) const CLEAR_PATH_CONFIDENCE: f32 = 0.5;
pub(crate) const OPEN_GAP_CONFIDENCE: f32 = 0.45;
pub(crate) const BLOCKED_PATH_CONFIDENCE: f32 = 0.3;

// --- Obstacles ---
pub(crate) const HIGH_THREAT_AREA: f32 = 0.15;
pub(crate) const MEDIUM_THREAT_AREA: f32 = 0.08;
pub(crate) const PATH_BAND_LEFT: f32 = 0.25; // Normalized X band considered "in path"
pub(crate) const PATH_BAND_RIGHT: f32 = 0.75;
pub(crate) const PATH_MIN_REL_Y: f32 = 0.3;
pub(crate) const MAX_OBSTACLES: usize = 3;

// --- Instructions ---
pub(crate) const LOW_CONFIDENCE_THRESHOLD: f32 = 0.4;
pub(crate) const MAX_OBSTACLE_WARNINGS: usize = 2;

// --- Scene summary ---
pub(crate) const SUMMARY_SOFT_LIMIT: usize = 90;
pub(crate) const SUMMARY_FALLBACK_LABELS: usize = 3;
pub(crate) const EMPTY_SCENE_DESCRIPTION: &str = "No clear objects ahead. Path may be open.";

// --- Composite description ---
pub(crate) const MIN_TEXT_CONFIDENCE: f32 = 0.5;
pub(crate) const MAX_TEXT_CHARS: usize = 200;
pub(crate) const CAPTION_UNAVAILABLE: &str = "Scene analysis unavailable";
pub(crate) const NO_OBJECTS_IN_VIEW: &str = "No specific objects detected in view";
