use crate::detect::property::direction::PathDirection;
use crate::detect::property::distance::DistanceCategory;
use crate::detect::property::obstacle::ObstacleRecord;
use crate::detect::{LOW_CONFIDENCE_THRESHOLD, MAX_OBSTACLE_WARNINGS};

const TARGET: &str = "{t}";

/// Phrase variants per path direction (outer, `PathDirection::ALL` order) and
/// known distance (inner, closest first). `{t}` stands for the target reference.
static PHRASES: [[[&str; 2]; 5]; 7] = [
    // center
    [
        ["{t} is right in front. Slow and steady.", "Almost there, {t} directly ahead, ease forward."],
        ["{t} straight ahead, move forward carefully.", "Head straight, {t} is just ahead."],
        ["{t} ahead, continue forward.", "Keep going straight toward {t}."],
        ["{t} further ahead, steady pace.", "Stay centered and continue forward."],
        ["{t} is far ahead, you can walk confidently.", "Long way ahead, proceed straight."],
    ],
    // slightly left
    [
        ["{t} just left, small step left then forward.", "Tiny left adjustment, then move ahead."],
        ["Drift a little left toward {t}.", "Slight left, then forward."],
        ["Slight left adjustment toward {t}.", "Nudge left and go ahead."],
        ["Angle slightly left to line up with {t}.", "Veer gently left then continue."],
        ["Turn a touch left and continue toward it.", "Bring your direction a bit left and walk on."],
    ],
    // left
    [
        ["{t} is close on your left, turn carefully.", "Slow left turn, {t} is right there."],
        ["Turn left and move forward slowly.", "Left turn now, then straight."],
        ["Turn left toward {t} then walk ahead.", "Face left and proceed forward."],
        ["Turn left and advance toward it.", "Rotate left then continue walking."],
        ["Head left and keep a steady pace.", "Take a left heading and continue."],
    ],
    // hard left
    [
        ["Sharp left needed now, go slowly.", "Hard left turn here, take care."],
        ["Make a firm left turn toward {t}.", "Strong left turn, then forward."],
        ["Hard left to align, then continue.", "Pivot left sharply and proceed."],
        ["Big left turn, then head forward.", "Swing left strongly and advance."],
        ["Hard left then steady walk ahead.", "Rotate left fully and continue."],
    ],
    // slightly right
    [
        ["Just right a little, then ahead.", "Tiny step right then move forward."],
        ["Ease slightly right toward {t}.", "Shift a bit right then continue."],
        ["Nudge right and go on.", "Slight right correction then forward."],
        ["Angle a little right then continue.", "Veer gently right toward it."],
        ["Turn a touch right and walk forward.", "Bring your direction a bit right and proceed."],
    ],
    // right
    [
        ["{t} close on your right, turn carefully.", "Slow right turn, it's right there."],
        ["Turn right and move forward slowly.", "Right turn now, then straight ahead."],
        ["Turn right toward {t} then walk ahead.", "Face right and proceed forward."],
        ["Turn right and advance toward it.", "Rotate right then continue walking."],
        ["Head right and keep a steady pace.", "Take a right heading and continue."],
    ],
    // hard right
    [
        ["Sharp right needed now, go slowly.", "Hard right turn here, take care."],
        ["Make a firm right turn toward {t}.", "Strong right turn, then forward."],
        ["Hard right to align, then continue.", "Pivot right sharply and proceed."],
        ["Big right turn, then head forward.", "Swing right strongly and advance."],
        ["Hard right then steady walk ahead.", "Rotate right fully and continue."],
    ],
];

/// Variants for a direction and distance pair. `None` for `unknown` and for
/// a clear frame, which use the generic move phrase.
pub fn phrase_variants(
    direction: PathDirection,
    distance: Option<DistanceCategory>,
) -> Option<&'static [&'static str; 2]> {
    let distance = distance.filter(|d| *d != DistanceCategory::Unknown)?;
    Some(&PHRASES[direction.ordinal()][distance.rank()])
}

/// Stable across runs and platforms: the sum of both enum ordinals, wrapped
/// to the number of variants.
pub fn variant_index(
    direction: PathDirection,
    distance: Option<DistanceCategory>,
    variants: usize,
) -> usize {
    let distance_ordinal = distance.map_or(DistanceCategory::ALL.len(), |d| d.rank());
    (direction.ordinal() + distance_ordinal) % variants.max(1)
}

/// How the instruction refers to what the user asked for.
pub fn target_reference(target: Option<&str>, target_count: usize) -> String {
    match target {
        Some("path") => "the clear path".to_string(),
        Some(t) if target_count > 1 => format!("the {}s", t),
        Some(t) => format!("the {}", t),
        None => "it".to_string(),
    }
}

/// Label used in the generic phrase and reported when the frame is clear.
pub fn distance_label(distance: Option<DistanceCategory>) -> &'static str {
    distance.map_or("clear", |d| d.as_str())
}

/// Instruction for a resolved target: the resolver's sentence plus a caution
/// for the nearest close obstacle.
pub fn precise_instruction(resolved: &str, obstacles: &[ObstacleRecord]) -> String {
    let mut instruction = resolved.trim().to_string();
    if let Some(obstacle) = obstacles.iter().find(|o| o.distance.is_near()) {
        instruction.push_str(&format!(
            " Caution: {} detected {}.",
            obstacle.name, obstacle.position
        ));
    }
    ensure_terminal_punctuation(&instruction)
}

/// Instruction for the free-path fallback, picked from the phrase matrix.
///
/// Args:
///     direction (PathDirection): Recommended heading.
///     distance (Option<DistanceCategory>): Nearest object, `None` when clear.
///     confidence (f32): Aggregate confidence of the recommendation.
///     target (Option<&str>): Requested target, `"path"` for the open path.
///     target_count (usize): Number of matched detections.
///     obstacles (&[ObstacleRecord]): Obstacles already ranked closest first.
pub fn fallback_instruction(
    direction: PathDirection,
    distance: Option<DistanceCategory>,
    confidence: f32,
    target: Option<&str>,
    target_count: usize,
    obstacles: &[ObstacleRecord],
) -> String {
    let reference = target_reference(target, target_count);

    let mut instruction = match phrase_variants(direction, distance) {
        Some(variants) => {
            let template = variants[variant_index(direction, distance, variants.len())];
            capitalize_first(&template.replace(TARGET, &reference))
        }
        None => format!("Move {} ({}).", direction, distance_label(distance)),
    };

    let warnings: Vec<String> = obstacles
        .iter()
        .filter(|o| o.distance.is_near())
        .take(MAX_OBSTACLE_WARNINGS)
        .map(ObstacleRecord::name_with_side)
        .collect();
    if !warnings.is_empty() {
        let trimmed_len = instruction.trim_end_matches(['.', '!', '?']).len();
        instruction.truncate(trimmed_len);
        instruction.push_str(&format!(". Watch for {}.", warnings.join(", ")));
    }

    if confidence < LOW_CONFIDENCE_THRESHOLD {
        instruction.push_str(" I'm not fully sure, double check.");
    }

    ensure_terminal_punctuation(&instruction)
}

pub fn ensure_terminal_punctuation(text: &str) -> String {
    let text = text.trim();
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::property::direction::HorizontalPosition;
    use crate::detect::property::obstacle::ThreatLevel;

    fn obstacle(name: &str, distance: DistanceCategory, position: HorizontalPosition) -> ObstacleRecord {
        ObstacleRecord {
            name: name.to_string(),
            distance,
            position,
            threat: ThreatLevel::High,
            confidence: 0.8,
        }
    }

    #[test]
    fn test_every_cell_has_two_variants() {
        for direction in PathDirection::ALL {
            for distance in DistanceCategory::ALL {
                let variants = phrase_variants(direction, Some(distance));
                match distance {
                    DistanceCategory::Unknown => assert!(variants.is_none()),
                    _ => assert!(variants.unwrap().iter().all(|v| !v.is_empty())),
                }
            }
        }
        assert!(phrase_variants(PathDirection::Center, None).is_none());
    }

    #[test]
    fn test_variant_selection_is_deterministic() {
        // center (0) + medium (2) -> variant 0
        let first = fallback_instruction(
            PathDirection::Center,
            Some(DistanceCategory::Medium),
            0.9,
            Some("door"),
            1,
            &[],
        );
        assert_eq!(first, "The door ahead, continue forward.");

        // center (0) + close (1) -> variant 1
        let second = fallback_instruction(
            PathDirection::Center,
            Some(DistanceCategory::Close),
            0.9,
            Some("door"),
            1,
            &[],
        );
        assert_eq!(second, "Head straight, the door is just ahead.");
    }

    #[test]
    fn test_target_references() {
        assert_eq!(target_reference(Some("chair"), 3), "the chairs");
        assert_eq!(target_reference(Some("chair"), 1), "the chair");
        assert_eq!(target_reference(Some("path"), 0), "the clear path");
        assert_eq!(target_reference(None, 0), "it");
    }

    #[test]
    fn test_clear_frame_uses_generic_phrase() {
        let text = fallback_instruction(PathDirection::Center, None, 0.5, Some("path"), 0, &[]);
        assert_eq!(text, "Move center (clear).");
    }

    #[test]
    fn test_obstacle_warnings_and_low_confidence() {
        let obstacles = [
            obstacle("chair", DistanceCategory::VeryClose, HorizontalPosition::Center),
            obstacle("bench", DistanceCategory::Medium, HorizontalPosition::Left),
            obstacle("dog", DistanceCategory::Close, HorizontalPosition::Right),
        ];
        let text = fallback_instruction(
            PathDirection::Left,
            Some(DistanceCategory::VeryClose),
            0.3,
            Some("path"),
            0,
            &obstacles,
        );
        // left (2) + very close (0) -> variant 0
        assert_eq!(
            text,
            "The clear path is close on your left, turn carefully. \
             Watch for chair center, dog right. I'm not fully sure, double check."
        );
    }

    #[test]
    fn test_precise_caution() {
        let obstacles = [
            obstacle("bench", DistanceCategory::Medium, HorizontalPosition::Left),
            obstacle("dog", DistanceCategory::Close, HorizontalPosition::Right),
        ];
        let text = precise_instruction("Walk forward steadily. The cup is directly ahead.", &obstacles);
        assert_eq!(
            text,
            "Walk forward steadily. The cup is directly ahead. Caution: dog detected right."
        );
        assert_eq!(precise_instruction("Go", &[]), "Go.");
    }

    #[test]
    fn test_always_terminated() {
        for direction in PathDirection::ALL {
            for distance in DistanceCategory::ALL.map(Some).into_iter().chain([None]) {
                for confidence in [0.1, 0.9] {
                    let text = fallback_instruction(direction, distance, confidence, None, 0, &[]);
                    assert!(text.ends_with(['.', '!', '?']), "{}", text);
                }
            }
        }
    }
}
