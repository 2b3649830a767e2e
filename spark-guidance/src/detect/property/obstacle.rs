use crate::detect::detection::{Detection, FrameContext};
use crate::detect::property::direction::HorizontalPosition;
use crate::detect::property::distance::DistanceCategory;
use crate::detect::{
    HIGH_THREAT_AREA, MAX_OBSTACLES, MEDIUM_THREAT_AREA, PATH_BAND_LEFT, PATH_BAND_RIGHT,
    PATH_MIN_REL_Y,
};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Severity of an obstacle, from its share of the frame area.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    High,
    Medium,
    Low,
}

impl ThreatLevel {
    pub fn from_relative_area(rel_area: f32) -> Self {
        if rel_area > HIGH_THREAT_AREA {
            ThreatLevel::High
        } else if rel_area > MEDIUM_THREAT_AREA {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }
}

impl Display for ThreatLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatLevel::High => write!(f, "high"),
            ThreatLevel::Medium => write!(f, "medium"),
            ThreatLevel::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleRecord {
    pub name: String,
    pub distance: DistanceCategory,
    pub position: HorizontalPosition,
    pub threat: ThreatLevel,
    pub confidence: f32,
}

impl ObstacleRecord {
    /// "chair left"
    pub fn name_with_side(&self) -> String {
        format!("{} {}", self.name, self.position)
    }
}

/// Picks the detections standing in the walking path that are large or
/// close, closest first.
///
/// Args:
///     detections (&[Detection]): Every detection in the frame.
///     excluded (&[usize]): Indices of the matched targets, never reported.
///     frame (&FrameContext): Dimensions of the analyzed frame.
///
/// Returns:
///     Vec<ObstacleRecord>: At most three records, sorted by distance then threat.
pub fn analyze_obstacles(
    detections: &[Detection],
    excluded: &[usize],
    frame: &FrameContext,
) -> Vec<ObstacleRecord> {
    let mut obstacles: Vec<ObstacleRecord> = detections
        .iter()
        .enumerate()
        .filter(|(index, _)| !excluded.contains(index))
        .filter_map(|(_, detection)| {
            let bounding_box = detection.valid_box()?;
            let (cx, cy) = bounding_box.center();
            let rel_x = cx / frame.width();
            let rel_y = cy / frame.height();

            let threat = ThreatLevel::from_relative_area(bounding_box.area() / frame.area());
            let distance = DistanceCategory::of(detection, frame);

            let in_path = PATH_BAND_LEFT < rel_x && rel_x < PATH_BAND_RIGHT && rel_y > PATH_MIN_REL_Y;
            let significant = threat != ThreatLevel::Low || distance.is_near();
            if !(in_path && significant) {
                return None;
            }

            Some(ObstacleRecord {
                name: detection.name.clone(),
                distance,
                position: HorizontalPosition::from_obstacle_x(rel_x),
                threat,
                confidence: detection.confidence,
            })
        })
        .collect();

    obstacles.sort_by_key(|o| (o.distance, o.threat));
    obstacles.truncate(MAX_OBSTACLES);
    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detection::BoundingBox;

    fn detection(name: &str, x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection::new(name, 0.8, Some(BoundingBox::new(x1, y1, x2, y2)))
    }

    #[test]
    fn test_threat_levels() {
        assert_eq!(ThreatLevel::from_relative_area(0.2), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_relative_area(0.1), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_relative_area(0.08), ThreatLevel::Low);
    }

    #[test]
    fn test_only_in_path_significant_obstacles() {
        let frame = FrameContext::default();
        let detections = [
            // Large, central, low in frame.
            detection("chair", 220.0, 200.0, 420.0, 460.0),
            // Same size but at the left edge.
            detection("sofa", 0.0, 200.0, 150.0, 460.0),
            // Central but tiny and far.
            detection("cup", 310.0, 200.0, 330.0, 220.0),
            // Central but in the top of the frame.
            detection("clock", 250.0, 0.0, 390.0, 100.0),
            Detection::new("door", 0.9, None),
        ];
        let obstacles = analyze_obstacles(&detections, &[], &frame);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].name, "chair");
        assert_eq!(obstacles[0].position, HorizontalPosition::Center);
        assert_eq!(obstacles[0].threat, ThreatLevel::High);
        assert_eq!(obstacles[0].distance, DistanceCategory::VeryClose);
    }

    #[test]
    fn test_excluded_targets_never_reported() {
        let frame = FrameContext::default();
        let detections = [
            detection("person", 220.0, 200.0, 420.0, 460.0),
            detection("person", 230.0, 210.0, 410.0, 450.0),
        ];
        let obstacles = analyze_obstacles(&detections, &[0], &frame);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].confidence, 0.8);
        assert!(analyze_obstacles(&detections, &[0, 1], &frame).is_empty());
    }

    #[test]
    fn test_sorted_and_capped() {
        let frame = FrameContext::default();
        let detections = [
            // medium distance, medium threat
            detection("bench", 160.0, 170.0, 480.0, 260.0),
            // very close
            detection("chair", 220.0, 200.0, 420.0, 460.0),
            // close, on the right
            detection("dog", 300.0, 160.0, 470.0, 310.0),
            // very close, left of center
            detection("bag", 170.0, 200.0, 250.0, 440.0),
        ];
        let obstacles = analyze_obstacles(&detections, &[], &frame);
        let names: Vec<&str> = obstacles.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["chair", "bag", "dog"]);
        assert_eq!(obstacles[1].position, HorizontalPosition::Left);
        assert_eq!(obstacles[1].name_with_side(), "bag left");
    }

    #[test]
    fn test_serialized_labels() {
        let record = ObstacleRecord {
            name: "chair".to_string(),
            distance: DistanceCategory::VeryClose,
            position: HorizontalPosition::Left,
            threat: ThreatLevel::High,
            confidence: 0.5,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "chair",
                "distance": "very close",
                "position": "left",
                "threat": "high",
                "confidence": 0.5
            })
        );
    }
}
