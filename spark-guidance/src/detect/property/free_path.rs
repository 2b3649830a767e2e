use crate::detect::detection::{Detection, FrameContext};
use crate::detect::property::direction::{PathDirection, Side};
use crate::detect::property::distance::DistanceCategory;
use crate::detect::{
    BLOCKED_PATH_CONFIDENCE, CLEAR_PATH_CONFIDENCE, INTERVAL_MERGE_TOLERANCE, MIN_GAP_WIDTH,
    OPEN_GAP_CONFIDENCE,
};
use log::debug;

/// Horizontal span `[start, end]` in normalized frame coordinates.
pub type Interval = (f32, f32);

/// Recommendation produced when no requested target could be located.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreePath {
    pub direction: PathDirection,
    /// Closest categorical distance among all detections. `None` means the
    /// frame is clear.
    pub nearest: Option<DistanceCategory>,
    pub confidence: f32,
    /// The widest open gap, when one exists.
    pub gap: Option<Interval>,
}

impl FreePath {
    pub fn is_clear(&self) -> bool {
        self.nearest.is_none()
    }
}

/// Finds the most open horizontal direction in the frame. Always returns a
/// recommendation.
///
/// Args:
///     detections (&[Detection]): Every detection in the frame.
///     frame (&FrameContext): Dimensions of the analyzed frame.
///
/// Returns:
///     FreePath: `center`/clear when nothing occupies the frame, the center
///     of the widest gap otherwise, or the less covered half when the
///     occupied spans leave no usable gap.
pub fn find_free_path(detections: &[Detection], frame: &FrameContext) -> FreePath {
    let mut intervals = project_intervals(detections, frame);
    if intervals.is_empty() {
        return FreePath {
            direction: PathDirection::Center,
            nearest: None,
            confidence: CLEAR_PATH_CONFIDENCE,
            gap: None,
        };
    }

    let merged = merge_intervals(&mut intervals);
    let nearest = nearest_obstacle_distance(detections, frame);

    let Some(widest) = widest_gap(&open_gaps(&merged)) else {
        let (left, right) = coverage_by_half(&merged);
        let side = if left < right { Side::Left } else { Side::Right };
        debug!("No open gap, left coverage {:.2}, right coverage {:.2}", left, right);
        return FreePath {
            direction: PathDirection::toward(side),
            nearest,
            confidence: BLOCKED_PATH_CONFIDENCE,
            gap: None,
        };
    };

    let gap_center = (widest.0 + widest.1) / 2.0;
    let direction = PathDirection::from_offset(gap_center - 0.5);
    debug!(
        "Widest gap [{:.2}, {:.2}] points {}",
        widest.0, widest.1, direction
    );

    FreePath {
        direction,
        nearest,
        confidence: OPEN_GAP_CONFIDENCE,
        gap: Some(widest),
    }
}

/// Projects usable boxes onto the horizontal axis, clipped to the frame.
fn project_intervals(detections: &[Detection], frame: &FrameContext) -> Vec<Interval> {
    detections
        .iter()
        .filter_map(Detection::valid_box)
        .filter_map(|b| {
            let x1 = b.x1.clamp(0.0, frame.width());
            let x2 = b.x2.clamp(0.0, frame.width());
            (x2 > x1).then(|| (x1 / frame.width(), x2 / frame.width()))
        })
        .collect()
}

/// Sorts by start and merges spans that overlap or nearly touch.
pub fn merge_intervals(intervals: &mut [Interval]) -> Vec<Interval> {
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for &(start, end) in intervals.iter() {
        match merged.last_mut() {
            Some(current) if start <= current.1 + INTERVAL_MERGE_TOLERANCE => {
                current.1 = current.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Complement of the merged spans, keeping only gaps wider than the minimum.
pub fn open_gaps(merged: &[Interval]) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut prev_end = 0.0;
    for &(start, end) in merged {
        if start - prev_end > MIN_GAP_WIDTH {
            gaps.push((prev_end, start));
        }
        prev_end = end;
    }
    if 1.0 - prev_end > MIN_GAP_WIDTH {
        gaps.push((prev_end, 1.0));
    }
    gaps
}

/// The first of the widest gaps.
fn widest_gap(gaps: &[Interval]) -> Option<Interval> {
    gaps.iter().copied().fold(None, |widest, gap| match widest {
        Some(w) if w.1 - w.0 >= gap.1 - gap.0 => Some(w),
        _ => Some(gap),
    })
}

fn coverage_by_half(merged: &[Interval]) -> (f32, f32) {
    let left = merged
        .iter()
        .filter(|(start, _)| *start < 0.5)
        .map(|(start, end)| (end.min(0.5) - start).max(0.0))
        .sum();
    let right = merged
        .iter()
        .filter(|(_, end)| *end > 0.5)
        .map(|(start, end)| (end - start.max(0.5)).max(0.0))
        .sum();
    (left, right)
}

/// Closest categorical distance over every detection, boxless ones counting
/// as unknown. `None` for an empty frame.
pub fn nearest_obstacle_distance(
    detections: &[Detection],
    frame: &FrameContext,
) -> Option<DistanceCategory> {
    detections
        .iter()
        .map(|d| DistanceCategory::of(d, frame))
        .min()
}
