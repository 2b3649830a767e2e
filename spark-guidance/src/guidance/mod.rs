pub mod locator;
pub mod resolver;
pub mod route;

use crate::detect::analysis::compose::CompositeDescriber;
use crate::detect::analysis::instruction::{distance_label, fallback_instruction, precise_instruction};
use crate::detect::analysis::summary::summarize_scene;
use crate::detect::analysis::{SceneData, TextFragment};
use crate::detect::detection::{Detection, FrameContext};
use crate::detect::property::direction::{Direction, PositionBucket};
use crate::detect::property::distance::DistanceCategory;
use crate::detect::property::free_path::find_free_path;
use crate::detect::property::obstacle::{analyze_obstacles, ObstacleRecord};
use crate::detect::property::target::extract_targets;
use crate::guidance::locator::LocatorOutcome;
use crate::guidance::resolver::{precise_note, resolve_target, MetricDistance, ResolvedTarget};
use crate::guidance::route::RoutePlan;
use crate::vocabulary::Vocabulary;
use log::debug;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Target name reported by the free-path fallback when no keyword matched.
pub const PATH_TARGET: &str = "path";

/// Distance reported with a guidance result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuidanceDistance {
    /// Nearest object on the free path.
    Category(DistanceCategory),
    /// Nothing occupies the frame.
    Clear,
    /// Estimated distance to a resolved target.
    Metric(MetricDistance),
}

impl GuidanceDistance {
    fn from_nearest(nearest: Option<DistanceCategory>) -> Self {
        nearest.map_or(GuidanceDistance::Clear, GuidanceDistance::Category)
    }
}

impl Display for GuidanceDistance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GuidanceDistance::Category(category) => write!(f, "{}", category),
            GuidanceDistance::Clear => write!(f, "{}", distance_label(None)),
            GuidanceDistance::Metric(metric) => write!(f, "{}", metric),
        }
    }
}

impl Serialize for GuidanceDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Structured heading data, only present when a target was resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationDetail {
    pub angle_degrees: f32,
    pub distance_meters: f32,
    pub coordinates: [i64; 2],
    pub size_pixels: [i64; 2],
    pub turn_instruction: String,
    pub approach_instruction: String,
    pub position: PositionBucket,
}

impl NavigationDetail {
    fn from_resolved(resolved: &ResolvedTarget) -> Self {
        Self {
            angle_degrees: resolved.position.angle_degrees,
            distance_meters: resolved.position.distance_meters,
            coordinates: resolved.position.coordinates(),
            size_pixels: resolved.position.pixel_size(),
            turn_instruction: resolved.turn_instruction.clone(),
            approach_instruction: resolved.approach_instruction.to_string(),
            position: resolved.position.bucket,
        }
    }

    /// "[Precise: 12.3° left, 3.2m]"
    pub fn precise_note(&self) -> String {
        precise_note(self.angle_degrees, self.distance_meters)
    }
}

/// Guidance for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuidanceResult {
    pub target: Option<String>,
    pub direction: Direction,
    pub distance: GuidanceDistance,
    /// Categorical closeness of the resolved target, or of the nearest object
    /// on the free path. `None` when the frame is clear.
    pub proximity: Option<DistanceCategory>,
    pub confidence: f32,
    pub instruction: String,
    pub obstacles: Vec<ObstacleRecord>,
    pub target_count: usize,
    pub navigation_detail: Option<NavigationDetail>,
}

/// The spatial guidance engine. Holds only read-only tables, so one instance
/// can serve any number of concurrent callers.
pub struct GuidanceEngine {
    vocabulary: Vocabulary,
    describer: CompositeDescriber,
}

impl Default for GuidanceEngine {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

impl GuidanceEngine {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            describer: CompositeDescriber::new(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Indices of the detections matching the first query keyword that
    /// matches anything, with that keyword.
    pub(crate) fn match_targets(
        &self,
        detections: &[Detection],
        query: &str,
    ) -> Option<(String, Vec<usize>)> {
        extract_targets(query, &self.vocabulary)
            .into_iter()
            .find_map(|keyword| {
                let matched: Vec<usize> = detections
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.matches(&keyword))
                    .map(|(i, _)| i)
                    .collect();
                (!matched.is_empty()).then_some((keyword, matched))
            })
    }

    /// Computes guidance for one frame: resolves the queried target when it
    /// is in view, otherwise recommends the most open direction.
    ///
    /// Args:
    ///     detections (&[Detection]): The frame's detections, possibly empty.
    ///     query (&str): Free-text user request, possibly empty.
    ///     frame (&FrameContext): Dimensions of the analyzed frame.
    ///
    /// Returns:
    ///     GuidanceResult: Always produced. Identical inputs give identical output.
    pub fn compute_guidance(
        &self,
        detections: &[Detection],
        query: &str,
        frame: &FrameContext,
    ) -> GuidanceResult {
        let (target, candidates) = match self.match_targets(detections, query) {
            Some((keyword, matched)) => (Some(keyword), matched),
            None => (None, Vec::new()),
        };
        let obstacles = analyze_obstacles(detections, &candidates, frame);

        let resolved = target.as_deref().and_then(|keyword| {
            resolve_target(detections, &candidates, keyword, frame, &self.vocabulary)
        });

        if let Some(resolved) = resolved {
            return GuidanceResult {
                target,
                direction: Direction::Turn(resolved.turn),
                distance: GuidanceDistance::Metric(resolved.distance),
                proximity: Some(resolved.proximity),
                confidence: resolved.confidence,
                instruction: precise_instruction(&resolved.full_instruction, &obstacles),
                obstacles,
                target_count: candidates.len(),
                navigation_detail: Some(NavigationDetail::from_resolved(&resolved)),
            };
        }

        let path = find_free_path(detections, frame);
        let target = target.unwrap_or_else(|| PATH_TARGET.to_string());
        debug!(
            "No located target for '{}', free path points {} ({})",
            query,
            path.direction,
            distance_label(path.nearest)
        );

        GuidanceResult {
            instruction: fallback_instruction(
                path.direction,
                path.nearest,
                path.confidence,
                Some(&target),
                candidates.len(),
                &obstacles,
            ),
            target: Some(target),
            direction: Direction::Path(path.direction),
            distance: GuidanceDistance::from_nearest(path.nearest),
            proximity: path.nearest,
            confidence: path.confidence,
            obstacles,
            target_count: candidates.len(),
            navigation_detail: None,
        }
    }

    /// Short priority-ordered summary of every detection.
    pub fn summarize(&self, detections: &[Detection], frame: &FrameContext) -> String {
        summarize_scene(detections, frame, &self.vocabulary)
    }

    /// Full description joining an external caption, the object summary and
    /// any text read in view.
    pub fn describe_scene(
        &self,
        detections: &[Detection],
        frame: &FrameContext,
        caption: Option<&str>,
        text_fragments: &[TextFragment],
    ) -> String {
        let data = SceneData {
            detections,
            frame,
            vocabulary: &self.vocabulary,
            caption,
            text_fragments,
        };
        self.describer.describe(&data)
    }

    pub fn locate(&self, detections: &[Detection], query: &str, frame: &FrameContext) -> LocatorOutcome {
        locator::locate_object(detections, query, frame, &self.vocabulary)
    }

    pub fn plan_route(
        &self,
        detections: &[Detection],
        destination: &str,
        caption: Option<&str>,
        frame: &FrameContext,
    ) -> RoutePlan {
        route::plan_route(self, detections, destination, caption, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detection::BoundingBox;
    use crate::detect::property::direction::{PathDirection, TurnDirection};

    #[test]
    fn test_empty_frame() {
        let engine = GuidanceEngine::default();
        let result = engine.compute_guidance(&[], "", &FrameContext::default());
        assert_eq!(result.target.as_deref(), Some(PATH_TARGET));
        assert_eq!(result.direction, Direction::Path(PathDirection::Center));
        assert_eq!(result.distance, GuidanceDistance::Clear);
        assert_eq!(result.distance.to_string(), "clear");
        assert_eq!(result.instruction, "Move center (clear).");
        assert!(result.navigation_detail.is_none());
    }

    #[test]
    fn test_resolved_target_excluded_from_obstacles() {
        let engine = GuidanceEngine::default();
        let detections = [
            Detection::new("chair", 0.9, Some(BoundingBox::new(220.0, 200.0, 420.0, 460.0))),
            Detection::new("dog", 0.7, Some(BoundingBox::new(300.0, 160.0, 470.0, 310.0))),
        ];
        let result = engine.compute_guidance(&detections, "find the chair", &FrameContext::default());
        assert_eq!(result.target.as_deref(), Some("chair"));
        assert_eq!(result.direction, Direction::Turn(TurnDirection::Straight));
        assert_eq!(result.target_count, 1);
        assert!(result.obstacles.iter().all(|o| o.name != "chair"));
        assert_eq!(result.obstacles.len(), 1);
        assert!(result.instruction.ends_with(" Caution: dog detected right."));
        let detail = result.navigation_detail.unwrap();
        assert_eq!(detail.coordinates, [320, 330]);
        assert_eq!(detail.size_pixels, [200, 260]);
        assert_eq!(detail.position, PositionBucket::DirectlyAhead);
    }

    #[test]
    fn test_unmatched_keyword_falls_back_to_path() {
        let engine = GuidanceEngine::default();
        let detections = [Detection::new(
            "car",
            0.9,
            Some(BoundingBox::new(0.0, 100.0, 128.0, 200.0)),
        )];
        let result = engine.compute_guidance(&detections, "where is the exit", &FrameContext::default());
        assert_eq!(result.target.as_deref(), Some(PATH_TARGET));
        assert_eq!(result.direction, Direction::Path(PathDirection::SlightlyRight));
        assert_eq!(result.proximity, Some(DistanceCategory::Far));
        assert!(result.navigation_detail.is_none());
    }

    #[test]
    fn test_boxless_match_keeps_keyword() {
        let engine = GuidanceEngine::default();
        let detections = [Detection::new("door", 0.9, None)];
        let result = engine.compute_guidance(&detections, "door", &FrameContext::default());
        assert_eq!(result.target.as_deref(), Some("door"));
        assert_eq!(result.direction, Direction::Path(PathDirection::Center));
        assert_eq!(result.target_count, 1);
        assert!(result.navigation_detail.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let engine = GuidanceEngine::default();
        let result = engine.compute_guidance(&[], "", &FrameContext::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["direction"], "center");
        assert_eq!(json["distance"], "clear");
        assert_eq!(json["target"], "path");
        assert!(json["navigation_detail"].is_null());
    }
}
