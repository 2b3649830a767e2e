use crate::detect::detection::{Detection, FrameContext};
use crate::detect::property::direction::HorizontalPosition;
use crate::detect::{EMPTY_SCENE_DESCRIPTION, SUMMARY_FALLBACK_LABELS, SUMMARY_SOFT_LIMIT};
use crate::vocabulary::Vocabulary;
use hashbrown::HashSet;

/// Count of one label at one horizontal third, in first-seen order.
#[derive(Debug)]
struct PlacedCount {
    name: String,
    position: HorizontalPosition,
    count: usize,
}

/// Short description of everything in view, most important labels first:
/// "2 persons left; 1 car right".
pub fn summarize_scene(
    detections: &[Detection],
    frame: &FrameContext,
    vocabulary: &Vocabulary,
) -> String {
    if detections.is_empty() {
        return EMPTY_SCENE_DESCRIPTION.to_string();
    }

    let counts = count_by_position(detections, frame);
    let mut phrases = priority_phrases(&counts, vocabulary);
    if phrases.is_empty() {
        phrases = most_frequent_phrases(&counts);
    }

    capitalize(&phrases.join("; "))
}

fn horizontal_third(detection: &Detection, frame: &FrameContext) -> HorizontalPosition {
    match detection.valid_box() {
        Some(b) => HorizontalPosition::from_third(b.center().0 / frame.width()),
        None => HorizontalPosition::Center,
    }
}

fn count_by_position(detections: &[Detection], frame: &FrameContext) -> Vec<PlacedCount> {
    let mut counts: Vec<PlacedCount> = Vec::new();
    for detection in detections {
        let name = detection.name.to_lowercase();
        let position = horizontal_third(detection, frame);
        match counts
            .iter_mut()
            .find(|c| c.name == name && c.position == position)
        {
            Some(entry) => entry.count += 1,
            None => counts.push(PlacedCount {
                name,
                position,
                count: 1,
            }),
        }
    }
    counts
}

fn priority_phrases(counts: &[PlacedCount], vocabulary: &Vocabulary) -> Vec<String> {
    let mut phrases = Vec::new();
    // Groups may share labels; each label is described once.
    let mut described: HashSet<&str> = HashSet::new();

    for group in vocabulary.priority_groups() {
        let mut names: Vec<&str> = counts
            .iter()
            .filter(|c| group.contains(&c.name) && !described.contains(c.name.as_str()))
            .map(|c| c.name.as_str())
            .collect();
        if names.is_empty() {
            continue;
        }
        names.sort_unstable();
        names.dedup();

        for name in names {
            described.insert(name);
            let placed: Vec<&PlacedCount> = counts.iter().filter(|c| c.name == name).collect();
            let total: usize = placed.iter().map(|c| c.count).sum();
            let dominant = dominant_position(&placed);
            phrases.push(format!("{} {} {}", total, noun(name, total), dominant));
        }

        if phrases.join("; ").len() > SUMMARY_SOFT_LIMIT {
            break;
        }
    }

    phrases
}

/// Position with the highest count. Ties go to the position seen first.
fn dominant_position(placed: &[&PlacedCount]) -> HorizontalPosition {
    placed
        .iter()
        .copied()
        .fold(None::<&PlacedCount>, |best, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
        .map(|c| c.position)
        .unwrap_or(HorizontalPosition::Center)
}

fn most_frequent_phrases(counts: &[PlacedCount]) -> Vec<String> {
    let mut totals: Vec<(&str, usize)> = Vec::new();
    for c in counts {
        match totals.iter_mut().find(|(name, _)| *name == c.name) {
            Some((_, total)) => *total += c.count,
            None => totals.push((c.name.as_str(), c.count)),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    totals
        .into_iter()
        .take(SUMMARY_FALLBACK_LABELS)
        .map(|(name, total)| format!("{} {}", total, noun(name, total)))
        .collect()
}

/// Plural only for counts above one, and never doubles a trailing "s".
fn noun(name: &str, count: usize) -> String {
    if count > 1 && !name.ends_with('s') {
        format!("{}s", name)
    } else {
        name.to_string()
    }
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.trim().chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
