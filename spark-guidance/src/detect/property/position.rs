use crate::detect::detection::{Detection, FrameContext};
use crate::detect::property::direction::PositionBucket;
use crate::detect::{
    HORIZONTAL_FOV_DEGREES, MAX_ESTIMATED_DISTANCE_M, MIN_ESTIMATED_DISTANCE_M, MIN_PIXEL_HEIGHT,
};
use crate::vocabulary::Vocabulary;

/// Angle and metric distance of one object relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisePosition {
    pub center: (f32, f32),
    /// Signed horizontal offset from the optical axis. Negative is left.
    pub angle_degrees: f32,
    pub distance_meters: f32,
    pub bucket: PositionBucket,
    pub size_pixels: (f32, f32),
}

impl PrecisePosition {
    /// Zeroed position for objects whose box cannot be used.
    pub const UNKNOWN: PrecisePosition = PrecisePosition {
        center: (0.0, 0.0),
        angle_degrees: 0.0,
        distance_meters: 0.0,
        bucket: PositionBucket::Unknown,
        size_pixels: (0.0, 0.0),
    };

    /// Estimates angle and distance with a fixed 60 degree horizontal field of
    /// view and a pinhole model fed by the label's assumed real-world size.
    ///
    /// Never fails: a missing box, a degenerate box or a near-zero pixel
    /// height yields [`PrecisePosition::UNKNOWN`].
    pub fn calculate(detection: &Detection, frame: &FrameContext, vocabulary: &Vocabulary) -> Self {
        let Some(bounding_box) = detection.valid_box() else {
            return Self::UNKNOWN;
        };

        let pixel_height = bounding_box.height();
        if pixel_height <= MIN_PIXEL_HEIGHT {
            return Self::UNKNOWN;
        }

        let center = bounding_box.center();
        let angle_degrees = angle_from_center(center.0, frame);

        let real_size = vocabulary.object_size(&detection.name);
        let distance_meters = (real_size * frame.height() / pixel_height)
            .clamp(MIN_ESTIMATED_DISTANCE_M, MAX_ESTIMATED_DISTANCE_M);

        Self {
            center,
            angle_degrees,
            distance_meters,
            bucket: PositionBucket::from_angle(angle_degrees),
            size_pixels: (bounding_box.width(), pixel_height),
        }
    }

    pub fn is_known(&self) -> bool {
        self.bucket != PositionBucket::Unknown
    }

    /// Integer pixel center as reported to clients.
    pub fn coordinates(&self) -> [i64; 2] {
        [self.center.0 as i64, self.center.1 as i64]
    }

    /// Box width and height in whole pixels.
    pub fn pixel_size(&self) -> [i64; 2] {
        [self.size_pixels.0.round() as i64, self.size_pixels.1.round() as i64]
    }
}

/// Signed angle of a horizontal pixel position from the frame center.
pub fn angle_from_center(center_x: f32, frame: &FrameContext) -> f32 {
    let pixels_per_degree = frame.width() / HORIZONTAL_FOV_DEGREES;
    (center_x - frame.center_x()) / pixels_per_degree
}
