use crate::detect::analysis::instruction::ensure_terminal_punctuation;
use crate::detect::detection::{BoundingBox, ClientObject, Detection, FrameContext};
use crate::detect::property::direction::{PositionBucket, Side};
use crate::detect::property::position::PrecisePosition;
use crate::detect::property::target::extract_targets;
use crate::vocabulary::Vocabulary;
use log::debug;
use serde::Serialize;

const MAX_LISTED_DETECTIONS: usize = 5;
const MAX_SUGGESTIONS: usize = 3;
const QUERY_TRIM_CHARS: &[char] = &['?', '.', ',', '!'];

/// Heading and step data for a located object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedPosition {
    pub angle_degrees: f32,
    pub distance_meters: f32,
    pub coordinates: [i64; 2],
    pub size_pixels: [i64; 2],
    pub direction_instruction: String,
    pub navigation_steps: Vec<String>,
    pub distance_guidance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoundObject {
    pub object_name: String,
    pub confidence: f32,
    pub position: PositionBucket,
    pub distance: String,
    pub message: String,
    pub bbox: BoundingBox,
    pub precise_position: LocatedPosition,
    pub navigation_instruction: String,
    pub step_by_step: Vec<String>,
    pub all_detected: Vec<ClientObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingObject {
    pub object_name: String,
    pub message: String,
    pub all_detected: Vec<ClientObject>,
    pub suggestions: Vec<String>,
}

/// Answer to a "find my ..." request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocatorOutcome {
    Found(FoundObject),
    NotFound(MissingObject),
}

impl LocatorOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LocatorOutcome::Found(_))
    }

    pub fn message(&self) -> &str {
        match self {
            LocatorOutcome::Found(found) => &found.message,
            LocatorOutcome::NotFound(missing) => &missing.message,
        }
    }
}

/// Finds the most confident detection matching any keyword of `query`.
///
/// Args:
///     detections (&[Detection]): Every detection in the frame.
///     query (&str): What the user asked for, e.g. "find my cup".
///     frame (&FrameContext): Dimensions of the analyzed frame.
///     vocabulary (&Vocabulary): Stop words and size priors.
///
/// Returns:
///     LocatorOutcome: `Found` when a match has a usable box, otherwise
///     `NotFound` with suggestions drawn from the other detections.
pub fn locate_object(
    detections: &[Detection],
    query: &str,
    frame: &FrameContext,
    vocabulary: &Vocabulary,
) -> LocatorOutcome {
    let keywords = extract_targets(query, vocabulary);
    let all_detected: Vec<ClientObject> = detections
        .iter()
        .take(MAX_LISTED_DETECTIONS)
        .map(ClientObject::from)
        .collect();

    let best = detections
        .iter()
        .filter(|d| keywords.iter().any(|k| d.matches(k)))
        .filter_map(|d| {
            let position = PrecisePosition::calculate(d, frame, vocabulary);
            let bounding_box = d.valid_box()?;
            position.is_known().then_some((d, *bounding_box, position))
        })
        .fold(None, |best: Option<(&Detection, BoundingBox, PrecisePosition)>, candidate| {
            match best {
                Some(b) if b.0.confidence >= candidate.0.confidence => Some(b),
                _ => Some(candidate),
            }
        });

    match best {
        Some((detection, bbox, position)) => {
            debug!(
                "Located '{}' at {:.1} degrees, {:.1}m",
                detection.name, position.angle_degrees, position.distance_meters
            );
            LocatorOutcome::Found(found_object(detection, bbox, &position, all_detected))
        }
        None => {
            let object_name = keywords
                .first()
                .cloned()
                .unwrap_or_else(|| query.trim().to_string());
            let suggestions = similar_labels(detections, query, vocabulary);
            debug!(
                "'{}' not found among {} detections, {} suggestions",
                object_name,
                detections.len(),
                suggestions.len()
            );

            let mut message = format!(
                "Could not find {}. Try looking around or describe what you're looking for differently.",
                object_name
            );
            if !suggestions.is_empty() {
                message.push_str(&format!(
                    " However, I found similar objects: {}",
                    suggestions.join(", ")
                ));
            }

            LocatorOutcome::NotFound(MissingObject {
                object_name,
                message: ensure_terminal_punctuation(&message),
                all_detected,
                suggestions,
            })
        }
    }
}

fn found_object(
    detection: &Detection,
    bbox: BoundingBox,
    position: &PrecisePosition,
    all_detected: Vec<ClientObject>,
) -> FoundObject {
    let angle = position.angle_degrees;
    let meters = position.distance_meters;
    let (direction_instruction, navigation_steps) = direction_steps(angle, meters);
    let distance_guidance = distance_guidance(meters);

    FoundObject {
        object_name: detection.name.clone(),
        confidence: detection.confidence,
        position: position.bucket,
        distance: format!("{:.1} meters", meters),
        message: format!(
            "Found {}! {} Distance: {:.1} meters.",
            detection.name, direction_instruction, meters
        ),
        bbox,
        navigation_instruction: format!("{} {}", direction_instruction, distance_guidance),
        step_by_step: navigation_steps.clone(),
        precise_position: LocatedPosition {
            angle_degrees: angle,
            distance_meters: meters,
            coordinates: position.coordinates(),
            size_pixels: position.pixel_size(),
            direction_instruction,
            navigation_steps,
            distance_guidance,
        },
        all_detected,
    }
}

/// Where the object is, and the steps to face and reach it.
fn direction_steps(angle: f32, meters: f32) -> (String, Vec<String>) {
    let degrees = angle.abs();
    let side = Side::of(angle);

    if degrees < 2.0 {
        return (
            "The object is directly in front of you.".to_string(),
            vec!["Continue walking straight ahead".to_string()],
        );
    }

    let bearing = format!("The object is {:.1} degrees to your {}", degrees, side);
    if degrees < 15.0 {
        (
            format!("{}.", bearing),
            vec![
                format!("Turn slightly {} by about {:.0} degrees", side, degrees),
                "Then walk straight towards the object".to_string(),
            ],
        )
    } else if degrees < 45.0 {
        (
            format!("{}.", bearing),
            vec![
                format!("Turn {} by {:.0} degrees", side, degrees),
                format!("Walk forward approximately {:.1} meters", meters),
            ],
        )
    } else {
        (
            format!("{}, almost behind you.", bearing),
            vec![
                format!("Turn around {} by {:.0} degrees", side, degrees),
                format!("Walk forward approximately {:.1} meters", meters),
            ],
        )
    }
}

fn distance_guidance(meters: f32) -> String {
    if meters < 1.0 {
        "You're very close. Move carefully.".to_string()
    } else if meters < 3.0 {
        format!("Take about {} steps forward.", (meters * 1.5) as u32)
    } else if meters < 10.0 {
        format!("Walk about {:.0} meters forward.", meters)
    } else {
        format!("The object is quite far, about {:.0} meters away.", meters)
    }
}

/// Labels sharing a word with the query, in detection order without repeats.
fn similar_labels(detections: &[Detection], query: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let query = query.to_lowercase();
    let words: Vec<&str> = query
        .split_whitespace()
        .map(|w| w.trim_matches(QUERY_TRIM_CHARS))
        .filter(|w| !w.is_empty() && !vocabulary.is_stop_word(w))
        .collect();

    let mut suggestions: Vec<String> = Vec::new();
    for detection in detections {
        let label = detection.name.to_lowercase();
        let shares_word = words.iter().any(|w| label.contains(w))
            || label.split_whitespace().any(|part| words.contains(&part));
        if shares_word && !suggestions.contains(&detection.name) {
            suggestions.push(detection.name.clone());
            if suggestions.len() == MAX_SUGGESTIONS {
                break;
            }
        }
    }
    suggestions
}
