use crate::detect::detection::{BoundingBox, Detection, FrameContext};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Categorical closeness of an object, derived from its box alone.
///
/// Variants are declared nearest first, so the derived ordering ranks them
/// by closeness and `Unknown` sorts after every known category.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize)]
pub enum DistanceCategory {
    #[serde(rename = "very close")]
    VeryClose,
    #[serde(rename = "close")]
    Close,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "far")]
    Far,
    #[serde(rename = "very far")]
    VeryFar,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Display for DistanceCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DistanceCategory {
    pub const ALL: [DistanceCategory; 6] = [
        DistanceCategory::VeryClose,
        DistanceCategory::Close,
        DistanceCategory::Medium,
        DistanceCategory::Far,
        DistanceCategory::VeryFar,
        DistanceCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceCategory::VeryClose => "very close",
            DistanceCategory::Close => "close",
            DistanceCategory::Medium => "medium",
            DistanceCategory::Far => "far",
            DistanceCategory::VeryFar => "very far",
            DistanceCategory::Unknown => "unknown",
        }
    }

    /// Position in the closest-first ranking.
    pub fn rank(&self) -> usize {
        *self as usize
    }

    pub fn is_near(&self) -> bool {
        matches!(self, DistanceCategory::VeryClose | DistanceCategory::Close)
    }

    /// Classifies closeness from the box height and how low its bottom edge sits.
    /// Assumes a camera looking along the ground plane: large boxes reaching the
    /// bottom of the frame are the closest ones.
    ///
    /// Args:
    ///     bounding_box (Option<&BoundingBox>): The object's box, if any.
    ///     frame (&FrameContext): Dimensions of the analyzed frame.
    ///
    /// Returns:
    ///     DistanceCategory: `Unknown` for a missing or degenerate box.
    pub fn get_distance(bounding_box: Option<&BoundingBox>, frame: &FrameContext) -> Self {
        let Some(bounding_box) = bounding_box.filter(|b| !b.is_degenerate()) else {
            return DistanceCategory::Unknown;
        };

        let rel_height = bounding_box.height() / frame.height();
        let rel_bottom = bounding_box.y2 / frame.height();

        if rel_height > 0.4 && rel_bottom > 0.7 {
            DistanceCategory::VeryClose
        } else if rel_height > 0.25 && rel_bottom > 0.6 {
            DistanceCategory::Close
        } else if rel_height > 0.15 && rel_bottom > 0.5 {
            DistanceCategory::Medium
        } else if rel_height > 0.08 {
            DistanceCategory::Far
        } else {
            DistanceCategory::VeryFar
        }
    }

    pub fn of(detection: &Detection, frame: &FrameContext) -> Self {
        Self::get_distance(detection.bounding_box.as_ref(), frame)
    }
}
