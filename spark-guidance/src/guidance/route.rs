use crate::detect::detection::{Detection, FrameContext};
use crate::detect::property::direction::Side;
use crate::detect::property::position::PrecisePosition;
use crate::detect::property::target::extract_targets;
use crate::guidance::GuidanceEngine;
use log::debug;
use serde::Serialize;

const WALKING_SPEED_MPS: f32 = 1.2;
const STEPS_PER_METER: f32 = 1.3;
const SAFETY_CONE_DEGREES: f32 = 30.0;
const SAFETY_MARGIN_M: f32 = 2.0;
const MAX_SAFETY_NAMES: usize = 2;
const SIDE_ANGLE_DEGREES: f32 = 15.0;
const MAX_NEARBY_LISTED: usize = 4;
const MAX_NEARBY_SPOKEN: usize = 3;
const UNAVAILABLE_CAPTION: &str = "unavailable";

pub const EXPLORATION_SUGGESTIONS: [&str; 4] = [
    "Turn left 90 degrees and look again",
    "Turn right 90 degrees and look again",
    "Move forward 2-3 steps and scan again",
    "Ask for help describing the area",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteHeading {
    pub angle_degrees: f32,
    pub distance_meters: f32,
    pub heading_instruction: String,
    pub movement_instruction: String,
    pub estimated_steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub steps: Vec<String>,
    pub summary: String,
    pub safety_warning: String,
    pub total_distance: String,
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteToTarget {
    pub target: String,
    pub direction: RouteHeading,
    pub navigation: RouteSummary,
    pub response: String,
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exploration {
    pub target: String,
    pub obstacles: Vec<String>,
    pub path_analysis: String,
    pub recommended_action: String,
    pub environment: String,
    pub response: String,
    pub exploration_suggestions: [&'static str; 4],
}

/// Turn-by-turn plan toward a destination, or exploration advice when the
/// destination is not in view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoutePlan {
    Found(RouteToTarget),
    NotFound(Exploration),
}

impl RoutePlan {
    pub fn is_found(&self) -> bool {
        matches!(self, RoutePlan::Found(_))
    }

    pub fn response(&self) -> &str {
        match self {
            RoutePlan::Found(route) => &route.response,
            RoutePlan::NotFound(exploration) => &exploration.response,
        }
    }
}

/// Detection with its computed position, skipping the ones without one.
struct Placed<'a> {
    index: usize,
    detection: &'a Detection,
    position: PrecisePosition,
}

/// Plans a route to `destination` from one frame.
///
/// Args:
///     engine (&GuidanceEngine): Supplies the vocabulary and the per-frame guidance.
///     detections (&[Detection]): Every detection in the frame.
///     destination (&str): Free-text destination, e.g. "the door".
///     caption (Option<&str>): External scene caption, if any.
///     frame (&FrameContext): Dimensions of the analyzed frame.
///
/// Returns:
///     RoutePlan: `Found` when a destination keyword matches a detection
///     with a usable box, `NotFound` otherwise.
pub fn plan_route(
    engine: &GuidanceEngine,
    detections: &[Detection],
    destination: &str,
    caption: Option<&str>,
    frame: &FrameContext,
) -> RoutePlan {
    let vocabulary = engine.vocabulary();
    let environment = caption
        .map(|c| c.trim().trim_end_matches('.'))
        .filter(|c| !c.is_empty())
        .unwrap_or(UNAVAILABLE_CAPTION)
        .to_string();

    let placed: Vec<Placed> = detections
        .iter()
        .enumerate()
        .map(|(index, detection)| Placed {
            index,
            detection,
            position: PrecisePosition::calculate(detection, frame, vocabulary),
        })
        .filter(|p| p.position.is_known())
        .collect();

    let keywords = extract_targets(destination, vocabulary);
    let direct = keywords
        .iter()
        .find_map(|k| placed.iter().find(|p| p.detection.matches(k)));

    let target = match direct {
        Some(p) => Some((
            p.detection.name.clone(),
            p.position.angle_degrees,
            p.position.distance_meters,
            Some(p.index),
        )),
        None => {
            let guidance =
                engine.compute_guidance(detections, &format!("navigate to {}", destination), frame);
            guidance.navigation_detail.map(|detail| {
                (
                    guidance.target.unwrap_or_else(|| destination.to_string()),
                    detail.angle_degrees,
                    detail.distance_meters,
                    None,
                )
            })
        }
    };

    match target {
        Some((name, angle, meters, index)) => {
            debug!("Route to '{}': {:.1} degrees, {:.1}m", name, angle, meters);
            RoutePlan::Found(route_to_target(name, angle, meters, index, &placed, environment))
        }
        None => {
            debug!("'{}' not in view, suggesting exploration", destination);
            RoutePlan::NotFound(exploration(destination, &placed, environment))
        }
    }
}

fn route_to_target(
    target: String,
    angle: f32,
    meters: f32,
    target_index: Option<usize>,
    placed: &[Placed],
    environment: String,
) -> RouteToTarget {
    let (heading_step, heading_instruction) = heading(angle);
    let (movement_step, movement_instruction, estimated_steps) = movement(meters);

    let in_path: Vec<&str> = placed
        .iter()
        .filter(|p| Some(p.index) != target_index)
        .filter(|p| {
            p.position.angle_degrees.abs() < SAFETY_CONE_DEGREES
                && p.position.distance_meters < meters + SAFETY_MARGIN_M
        })
        .take(MAX_SAFETY_NAMES)
        .map(|p| p.detection.name.as_str())
        .collect();
    let (safety_step, safety_warning) = if in_path.is_empty() {
        ("3. Path appears clear".to_string(), "Path looks clear".to_string())
    } else {
        let names = in_path.join(", ");
        (
            format!("3. Watch out for: {} on your path", names),
            format!("Caution: {} detected ahead", names),
        )
    };

    let summary = format!(
        "To reach {}: {}, then {}.",
        target,
        heading_instruction,
        movement_instruction.to_lowercase()
    );

    RouteToTarget {
        target,
        direction: RouteHeading {
            angle_degrees: angle,
            distance_meters: meters,
            heading_instruction,
            movement_instruction,
            estimated_steps,
        },
        navigation: RouteSummary {
            steps: vec![heading_step, movement_step, safety_step],
            summary: summary.clone(),
            safety_warning,
            total_distance: format!("{:.1} meters", meters),
            estimated_time: estimated_time(meters),
        },
        response: summary,
        environment,
    }
}

/// Numbered orientation step and the heading phrase used in the summary.
fn heading(angle: f32) -> (String, String) {
    let degrees = angle.abs();
    let side = Side::of(angle);
    match degrees {
        d if d < 3.0 => (
            "1. You're facing the right direction".to_string(),
            "Continue straight ahead".to_string(),
        ),
        d if d < 15.0 => (
            format!("1. Turn slightly {} ({:.0} degrees)", side, d),
            format!("Small adjustment: turn {:.0} degrees {}", d, side),
        ),
        d if d < 45.0 => (
            format!("1. Turn {} ({:.0} degrees)", side, d),
            format!("Turn {} by {:.0} degrees", side, d),
        ),
        d if d < 90.0 => (
            format!("1. Turn sharply {} ({:.0} degrees)", side, d),
            format!("Sharp turn {}, {:.0} degrees", side, d),
        ),
        d => (
            format!("1. Turn around {} ({:.0} degrees)", side, d),
            format!("Turn around {}, the target is behind you", side),
        ),
    }
}

/// Numbered movement step, the movement phrase and the estimated effort.
fn movement(meters: f32) -> (String, String, String) {
    if meters < 1.0 {
        (
            "2. Move very slowly, you're almost there".to_string(),
            "Take 1-2 careful steps forward".to_string(),
            "1-2 steps".to_string(),
        )
    } else if meters < 3.0 {
        let steps = (meters * STEPS_PER_METER) as u32;
        (
            format!("2. Walk forward about {} steps", steps),
            format!("Walk {} steps forward", steps),
            format!("{} steps", steps),
        )
    } else if meters < 10.0 {
        (
            format!("2. Walk forward about {:.0} meters", meters),
            format!("Walk {:.0} meters forward", meters),
            format!("{:.0} meters", meters),
        )
    } else {
        (
            format!("2. Walk forward, it's quite far ({:.0} meters)", meters),
            format!("Long walk ahead, {:.0} meters", meters),
            format!("{:.0} meters", meters),
        )
    }
}

/// Walking time at a steady 1.2 m/s, in whole seconds below 20 meters.
fn estimated_time(meters: f32) -> String {
    let seconds = meters / WALKING_SPEED_MPS;
    if meters < 20.0 {
        format!("{} seconds", seconds as u32)
    } else {
        format!("{} minutes", ((seconds / 60.0) as u32).max(1))
    }
}

fn exploration(destination: &str, placed: &[Placed], environment: String) -> Exploration {
    let left = placed
        .iter()
        .filter(|p| p.position.angle_degrees < -SIDE_ANGLE_DEGREES)
        .count();
    let right = placed
        .iter()
        .filter(|p| p.position.angle_degrees > SIDE_ANGLE_DEGREES)
        .count();
    let center = placed.len() - left - right;

    let (path_analysis, recommended_action) = if center == 0 {
        ("Path ahead is clear", "Continue straight and explore ahead")
    } else if left < right {
        ("Clearer path to the left", "Try turning left to explore")
    } else if right < left {
        ("Clearer path to the right", "Try turning right to explore")
    } else {
        (
            "Objects detected in multiple directions",
            "Proceed carefully and look around",
        )
    };

    let obstacles: Vec<String> = placed
        .iter()
        .take(MAX_NEARBY_LISTED)
        .map(|p| {
            format!(
                "{} at {:.1}m, {:.0}° {}",
                p.detection.name,
                p.position.distance_meters,
                p.position.angle_degrees.abs(),
                Side::of(p.position.angle_degrees)
            )
        })
        .collect();

    let nearby = if obstacles.is_empty() {
        "none detected".to_string()
    } else {
        obstacles
            .iter()
            .take(MAX_NEARBY_SPOKEN)
            .cloned()
            .collect::<Vec<_>>()
            .join("; ")
    };
    let response = format!(
        "I don't see {} in your current view. Environment: {}. Nearby objects: {}. Recommendation: {}.",
        destination.trim(),
        environment,
        nearby,
        recommended_action
    );

    Exploration {
        target: destination.trim().to_string(),
        obstacles,
        path_analysis: path_analysis.to_string(),
        recommended_action: recommended_action.to_string(),
        environment,
        response,
        exploration_suggestions: EXPLORATION_SUGGESTIONS,
    }
}
