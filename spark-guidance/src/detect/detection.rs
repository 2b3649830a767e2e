use crate::detect::{DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH};
use crate::detect::property::target::matches_keyword;
use crate::error::{GuidanceError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `(x1, y1, x2, y2)` in pixel coordinates of the analyzed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Builds a box from a top-left origin and an extent.
    pub fn from_extent(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// A degenerate box cannot be used for positional math: the object's
    /// position is treated as unknown.
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.x2 <= self.x1 || self.y2 <= self.y1
    }
}

/// One recognized object in a frame. Built fresh per frame and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub name: String,
    pub confidence: f32,
    pub bounding_box: Option<BoundingBox>,
}

impl Detection {
    pub fn new(name: impl Into<String>, confidence: f32, bounding_box: Option<BoundingBox>) -> Self {
        Self {
            name: name.into(),
            confidence,
            bounding_box,
        }
    }

    /// The bounding box, only when it is usable for positional math.
    pub fn valid_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref().filter(|b| !b.is_degenerate())
    }

    /// Case-insensitive match against an extracted target keyword.
    pub fn matches(&self, keyword: &str) -> bool {
        matches_keyword(keyword, &self.name)
    }
}

/// Width and height of the analyzed frame. Always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    width: f32,
    height: f32,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl FrameContext {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(GuidanceError::InvalidFrame { width, height });
        }
        Ok(Self { width, height })
    }

    /// Resolves optional caller dimensions, taking each missing one from `fallback`.
    pub fn from_optional(
        width: Option<f32>,
        height: Option<f32>,
        fallback: &FrameContext,
    ) -> Result<Self> {
        Self::new(
            width.unwrap_or(fallback.width),
            height.unwrap_or(fallback.height),
        )
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// The two box shapes clients send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxInput {
    /// `bbox = [x1, y1, x2, y2]`
    Corners(BoundingBox),
    /// Separate `x, y, w, h` fields with a top-left origin.
    Extent { x: f32, y: f32, w: f32, h: f32 },
}

impl BoxInput {
    pub fn normalize(self) -> BoundingBox {
        match self {
            BoxInput::Corners(bounding_box) => bounding_box,
            BoxInput::Extent { x, y, w, h } => BoundingBox::from_extent(x, y, w, h),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDetectionInput {
    name: String,
    confidence: f32,
    bbox: Option<Vec<f32>>,
    x: Option<f32>,
    y: Option<f32>,
    w: Option<f32>,
    h: Option<f32>,
}

/// A detection as it arrives at the system boundary. Resolved once into a
/// [`Detection`] whose box is always in corner form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawDetectionInput")]
pub struct DetectionInput {
    pub name: String,
    pub confidence: f32,
    pub region: Option<BoxInput>,
}

impl TryFrom<RawDetectionInput> for DetectionInput {
    type Error = GuidanceError;

    fn try_from(raw: RawDetectionInput) -> Result<Self> {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(GuidanceError::InvalidDetection(
                "detection name must not be empty".to_string(),
            ));
        }
        if !raw.confidence.is_finite() {
            return Err(GuidanceError::InvalidDetection(format!(
                "confidence of '{}' is not a number",
                name
            )));
        }

        let region = match (raw.bbox, raw.x, raw.y, raw.w, raw.h) {
            (Some(bbox), ..) if bbox.len() == 4 => Some(BoxInput::Corners(BoundingBox::new(
                bbox[0], bbox[1], bbox[2], bbox[3],
            ))),
            (Some(bbox), ..) => {
                warn!("Ignoring bbox of '{}' with {} values", name, bbox.len());
                None
            }
            (None, Some(x), Some(y), Some(w), Some(h)) => Some(BoxInput::Extent { x, y, w, h }),
            _ => None,
        };

        Ok(Self {
            name,
            confidence: raw.confidence.clamp(0.0, 1.0),
            region,
        })
    }
}

impl From<DetectionInput> for Detection {
    fn from(input: DetectionInput) -> Self {
        Detection::new(input.name, input.confidence, input.region.map(BoxInput::normalize))
    }
}

/// Object shape expected by mobile clients: integer `x, y, w, h`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientObject {
    pub name: String,
    pub confidence: f32,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl From<&Detection> for ClientObject {
    fn from(detection: &Detection) -> Self {
        let (x, y, w, h) = match &detection.bounding_box {
            Some(b) => (
                b.x1 as i64,
                b.y1 as i64,
                b.width().max(0.0) as i64,
                b.height().max(0.0) as i64,
            ),
            None => (0, 0, 0, 0),
        };
        Self {
            name: detection.name.clone(),
            confidence: detection.confidence,
            x,
            y,
            w,
            h,
        }
    }
}
