use crate::detect::detection::{Detection, FrameContext};
use crate::detect::property::direction::{Side, TurnDirection};
use crate::detect::property::distance::DistanceCategory;
use crate::detect::property::position::PrecisePosition;
use crate::vocabulary::Vocabulary;
use log::debug;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Metric distance bands used for approach guidance, in meters.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ApproachBand {
    VeryClose,
    Close,
    Medium,
    Far,
    VeryFar,
}

impl ApproachBand {
    pub fn from_meters(meters: f32) -> Self {
        match meters {
            m if m < 0.5 => ApproachBand::VeryClose,
            m if m < 1.5 => ApproachBand::Close,
            m if m < 3.0 => ApproachBand::Medium,
            m if m < 10.0 => ApproachBand::Far,
            _ => ApproachBand::VeryFar,
        }
    }

    pub fn approach_instruction(&self) -> &'static str {
        match self {
            ApproachBand::VeryClose => "Move very slowly and carefully",
            ApproachBand::Close => "Take a few careful steps forward",
            ApproachBand::Medium => "Walk forward steadily",
            ApproachBand::Far => "Walk forward at normal pace",
            ApproachBand::VeryFar => "Walk forward, it's quite far",
        }
    }
}

impl Display for ApproachBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApproachBand::VeryClose => write!(f, "very close"),
            ApproachBand::Close => write!(f, "close"),
            ApproachBand::Medium => write!(f, "medium distance"),
            ApproachBand::Far => write!(f, "far"),
            ApproachBand::VeryFar => write!(f, "very far"),
        }
    }
}

/// Rendered metric distance, e.g. "medium distance (2.3 meters)".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDistance {
    pub band: ApproachBand,
    pub meters: f32,
}

impl MetricDistance {
    pub fn new(meters: f32) -> Self {
        Self {
            band: ApproachBand::from_meters(meters),
            meters,
        }
    }
}

impl Display for MetricDistance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.1} meters)", self.band, self.meters)
    }
}

impl Serialize for MetricDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of resolving a matched target to a heading and distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    /// Index of the closest located candidate in the frame's detections.
    pub best_index: usize,
    pub position: PrecisePosition,
    pub turn: TurnDirection,
    pub distance: MetricDistance,
    pub proximity: DistanceCategory,
    /// Mean confidence over every candidate.
    pub confidence: f32,
    pub turn_instruction: String,
    pub approach_instruction: &'static str,
    pub full_instruction: String,
}

pub fn turn_instruction(turn: TurnDirection, angle: f32) -> String {
    let degrees = angle.abs();
    match turn {
        TurnDirection::Straight => "Continue straight ahead".to_string(),
        TurnDirection::Slight(side) => {
            format!("Slight adjustment: turn {:.1} degrees {}", degrees, side)
        }
        TurnDirection::Turn(side) => format!("Turn {:.1} degrees {}", degrees, side),
        TurnDirection::Sharp(side) => format!("Sharp turn: {:.1} degrees {}", degrees, side),
        TurnDirection::TurnAround(side) => format!(
            "Turn around: object is {:.1} degrees {} behind you",
            degrees, side
        ),
    }
}

/// Resolves the candidates matching `target` to one heading and distance.
///
/// Args:
///     detections (&[Detection]): Every detection in the frame.
///     candidates (&[usize]): Indices of the detections matching the target.
///     target (&str): The matched keyword, used to name the object.
///     frame (&FrameContext): Dimensions of the analyzed frame.
///     vocabulary (&Vocabulary): Supplies the object size priors.
///
/// Returns:
///     Option<ResolvedTarget>: `None` when there are no candidates or none of
///     them has a usable box. The caller falls back to the free path.
pub fn resolve_target(
    detections: &[Detection],
    candidates: &[usize],
    target: &str,
    frame: &FrameContext,
    vocabulary: &Vocabulary,
) -> Option<ResolvedTarget> {
    if candidates.is_empty() {
        return None;
    }

    let confidence = candidates
        .iter()
        .map(|&i| detections[i].confidence)
        .sum::<f32>()
        / candidates.len() as f32;

    let (best_index, position) = candidates
        .iter()
        .map(|&i| (i, PrecisePosition::calculate(&detections[i], frame, vocabulary)))
        .filter(|(_, p)| p.is_known())
        .min_by(|a, b| a.1.distance_meters.total_cmp(&b.1.distance_meters))?;

    let angle = position.angle_degrees;
    let turn = TurnDirection::from_angle(angle);
    let distance = MetricDistance::new(position.distance_meters);
    let approach_instruction = distance.band.approach_instruction();
    let turn_instruction = turn_instruction(turn, angle);

    let full_instruction = if turn == TurnDirection::Straight {
        format!(
            "{}, the {} is directly ahead, {}.",
            approach_instruction, target, distance
        )
    } else {
        format!(
            "{}, then {} to the {}, {}.",
            turn_instruction,
            approach_instruction.to_lowercase(),
            target,
            distance
        )
    };

    debug!(
        "Resolved '{}' from {} candidates: {:.1} degrees, {:.1}m",
        target,
        candidates.len(),
        angle,
        position.distance_meters
    );

    Some(ResolvedTarget {
        best_index,
        position,
        turn,
        distance,
        proximity: DistanceCategory::of(&detections[best_index], frame),
        confidence,
        turn_instruction,
        approach_instruction,
        full_instruction,
    })
}

/// Bracketed summary appended to guidance for clients that show raw numbers.
pub fn precise_note(angle: f32, meters: f32) -> String {
    if angle.abs() > 2.0 {
        format!("[Precise: {:.1}° {}, {:.1}m]", angle.abs(), Side::of(angle), meters)
    } else {
        format!("[Precise: straight ahead, {:.1}m]", meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detection::BoundingBox;

    fn resolve(detections: &[Detection], target: &str) -> Option<ResolvedTarget> {
        let candidates: Vec<usize> = (0..detections.len()).collect();
        resolve_target(
            detections,
            &candidates,
            target,
            &FrameContext::default(),
            &Vocabulary::default(),
        )
    }

    #[test]
    fn test_centered_large_target() {
        let detections = [Detection::new(
            "person",
            0.9,
            Some(BoundingBox::new(220.0, 40.0, 420.0, 470.0)),
        )];
        let resolved = resolve(&detections, "person").unwrap();
        assert_eq!(resolved.turn, TurnDirection::Straight);
        assert_eq!(resolved.proximity, DistanceCategory::VeryClose);
        assert_eq!(resolved.distance.band, ApproachBand::Medium);
        assert_eq!(
            resolved.full_instruction,
            "Walk forward steadily, the person is directly ahead, medium distance (1.9 meters)."
        );
    }

    #[test]
    fn test_turn_clause() {
        // Center x = 160, 15 degrees left. Height 96px, default 1.0m prior: 5m.
        let detections = [Detection::new(
            "lamp",
            0.8,
            Some(BoundingBox::new(140.0, 100.0, 180.0, 196.0)),
        )];
        let resolved = resolve(&detections, "lamp").unwrap();
        assert_eq!(resolved.turn, TurnDirection::Turn(Side::Left));
        assert_eq!(
            resolved.full_instruction,
            "Turn 15.0 degrees left, then walk forward at normal pace to the lamp, far (5.0 meters)."
        );
    }

    #[test]
    fn test_closest_candidate_wins_and_confidence_averaged() {
        let detections = [
            Detection::new("chair", 0.6, Some(BoundingBox::new(500.0, 300.0, 540.0, 348.0))),
            Detection::new("chair", 1.0, Some(BoundingBox::new(300.0, 100.0, 340.0, 388.0))),
            Detection::new("chair", 0.8, None),
        ];
        let resolved = resolve(&detections, "chair").unwrap();
        assert_eq!(resolved.best_index, 1);
        assert!((resolved.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_unresolved() {
        assert!(resolve(&[], "chair").is_none());
        let boxless = [Detection::new("chair", 0.8, None)];
        assert!(resolve(&boxless, "chair").is_none());
    }

    #[test]
    fn test_metric_phrases() {
        assert_eq!(MetricDistance::new(0.5).to_string(), "close (0.5 meters)");
        assert_eq!(MetricDistance::new(12.34).to_string(), "very far (12.3 meters)");
        assert_eq!(ApproachBand::from_meters(9.99), ApproachBand::Far);
    }

    #[test]
    fn test_turn_around_text() {
        assert_eq!(
            turn_instruction(TurnDirection::TurnAround(Side::Right), 61.3),
            "Turn around: object is 61.3 degrees right behind you"
        );
    }

    #[test]
    fn test_precise_note() {
        assert_eq!(precise_note(-12.34, 3.21), "[Precise: 12.3° left, 3.2m]");
        assert_eq!(precise_note(1.5, 0.5), "[Precise: straight ahead, 0.5m]");
    }
}
