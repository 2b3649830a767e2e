use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Negative angles and offsets are on the left.
    pub fn of(value: f32) -> Self {
        if value < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verbal bucket for the angular offset of an object from the frame center.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PositionBucket {
    DirectlyAhead,
    Slightly(Side),
    Side(Side),
    Far(Side),
    Extreme(Side),
    Unknown,
}

impl PositionBucket {
    pub fn from_angle(angle: f32) -> Self {
        let side = Side::of(angle);
        match angle.abs() {
            a if a < 5.0 => PositionBucket::DirectlyAhead,
            a if a < 15.0 => PositionBucket::Slightly(side),
            a if a < 30.0 => PositionBucket::Side(side),
            a if a < 45.0 => PositionBucket::Far(side),
            _ => PositionBucket::Extreme(side),
        }
    }
}

impl Display for PositionBucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionBucket::DirectlyAhead => write!(f, "directly ahead"),
            PositionBucket::Slightly(side) => write!(f, "slightly {}", side),
            PositionBucket::Side(side) => write!(f, "{}", side),
            PositionBucket::Far(side) => write!(f, "far {}", side),
            PositionBucket::Extreme(side) => write!(f, "extreme {}", side),
            PositionBucket::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for PositionBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Turn class for a resolved target, by absolute angle.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TurnDirection {
    Straight,
    Slight(Side),
    Turn(Side),
    Sharp(Side),
    TurnAround(Side),
}

impl TurnDirection {
    pub fn from_angle(angle: f32) -> Self {
        let side = Side::of(angle);
        match angle.abs() {
            a if a < 2.0 => TurnDirection::Straight,
            a if a < 10.0 => TurnDirection::Slight(side),
            a if a < 30.0 => TurnDirection::Turn(side),
            a if a < 60.0 => TurnDirection::Sharp(side),
            _ => TurnDirection::TurnAround(side),
        }
    }
}

impl Display for TurnDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnDirection::Straight => write!(f, "straight"),
            TurnDirection::Slight(side) => write!(f, "slight_{}", side),
            TurnDirection::Turn(side) => write!(f, "{}", side),
            TurnDirection::Sharp(side) => write!(f, "sharp_{}", side),
            TurnDirection::TurnAround(side) => write!(f, "turn_around_{}", side),
        }
    }
}

/// Direction class for the free-path fallback, by offset of the widest gap.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PathDirection {
    Center,
    SlightlyLeft,
    Left,
    HardLeft,
    SlightlyRight,
    Right,
    HardRight,
}

impl PathDirection {
    pub const ALL: [PathDirection; 7] = [
        PathDirection::Center,
        PathDirection::SlightlyLeft,
        PathDirection::Left,
        PathDirection::HardLeft,
        PathDirection::SlightlyRight,
        PathDirection::Right,
        PathDirection::HardRight,
    ];

    /// Maps the signed offset of a gap center from the frame midline (0.5).
    pub fn from_offset(offset: f32) -> Self {
        let side = Side::of(offset);
        match (offset.abs(), side) {
            (o, _) if o < 0.06 => PathDirection::Center,
            (o, Side::Left) if o < 0.15 => PathDirection::SlightlyLeft,
            (o, Side::Left) if o < 0.3 => PathDirection::Left,
            (_, Side::Left) => PathDirection::HardLeft,
            (o, Side::Right) if o < 0.15 => PathDirection::SlightlyRight,
            (o, Side::Right) if o < 0.3 => PathDirection::Right,
            (_, Side::Right) => PathDirection::HardRight,
        }
    }

    pub fn toward(side: Side) -> Self {
        match side {
            Side::Left => PathDirection::Left,
            Side::Right => PathDirection::Right,
        }
    }

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PathDirection::Center => "center",
            PathDirection::SlightlyLeft => "slightly left",
            PathDirection::Left => "left",
            PathDirection::HardLeft => "hard left",
            PathDirection::SlightlyRight => "slightly right",
            PathDirection::Right => "right",
            PathDirection::HardRight => "hard right",
        }
    }
}

impl Display for PathDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction reported for one guidance frame.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Direction {
    Turn(TurnDirection),
    Path(PathDirection),
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Turn(turn) => write!(f, "{}", turn),
            Direction::Path(path) => write!(f, "{}", path),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Coarse horizontal placement of an object in the frame.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalPosition {
    Left,
    Center,
    Right,
}

impl HorizontalPosition {
    /// Obstacle placement: a narrow center band between 0.4 and 0.6.
    pub fn from_obstacle_x(rel_x: f32) -> Self {
        if rel_x < 0.4 {
            HorizontalPosition::Left
        } else if rel_x > 0.6 {
            HorizontalPosition::Right
        } else {
            HorizontalPosition::Center
        }
    }

    /// Scene summary placement: thirds of the frame.
    pub fn from_third(rel_x: f32) -> Self {
        if rel_x < 0.33 {
            HorizontalPosition::Left
        } else if rel_x > 0.66 {
            HorizontalPosition::Right
        } else {
            HorizontalPosition::Center
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HorizontalPosition::Left => "left",
            HorizontalPosition::Center => "center",
            HorizontalPosition::Right => "right",
        }
    }
}

impl Display for HorizontalPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_thresholds() {
        assert_eq!(TurnDirection::from_angle(1.9), TurnDirection::Straight);
        assert_eq!(TurnDirection::from_angle(-1.9), TurnDirection::Straight);
        assert_eq!(TurnDirection::from_angle(-5.0), TurnDirection::Slight(Side::Left));
        assert_eq!(TurnDirection::from_angle(12.0), TurnDirection::Turn(Side::Right));
        assert_eq!(TurnDirection::from_angle(-45.0), TurnDirection::Sharp(Side::Left));
        assert_eq!(TurnDirection::from_angle(75.0), TurnDirection::TurnAround(Side::Right));
        assert_eq!(TurnDirection::Slight(Side::Left).to_string(), "slight_left");
        assert_eq!(TurnDirection::TurnAround(Side::Right).to_string(), "turn_around_right");
    }

    #[test]
    fn test_position_buckets() {
        assert_eq!(PositionBucket::from_angle(4.9).to_string(), "directly ahead");
        assert_eq!(PositionBucket::from_angle(-10.0).to_string(), "slightly left");
        assert_eq!(PositionBucket::from_angle(20.0).to_string(), "right");
        assert_eq!(PositionBucket::from_angle(-40.0).to_string(), "far left");
        assert_eq!(PositionBucket::from_angle(50.0).to_string(), "extreme right");
    }

    #[test]
    fn test_path_offsets() {
        assert_eq!(PathDirection::from_offset(0.0), PathDirection::Center);
        assert_eq!(PathDirection::from_offset(-0.059), PathDirection::Center);
        assert_eq!(PathDirection::from_offset(-0.1), PathDirection::SlightlyLeft);
        assert_eq!(PathDirection::from_offset(0.2), PathDirection::Right);
        assert_eq!(PathDirection::from_offset(-0.35), PathDirection::HardLeft);
        assert_eq!(PathDirection::from_offset(0.45), PathDirection::HardRight);
    }

    #[test]
    fn test_horizontal_positions() {
        assert_eq!(HorizontalPosition::from_obstacle_x(0.35), HorizontalPosition::Left);
        assert_eq!(HorizontalPosition::from_obstacle_x(0.5), HorizontalPosition::Center);
        assert_eq!(HorizontalPosition::from_third(0.35), HorizontalPosition::Center);
        assert_eq!(HorizontalPosition::from_third(0.7), HorizontalPosition::Right);
    }

    #[test]
    fn test_direction_serializes_as_label() {
        let json = serde_json::to_string(&Direction::Path(PathDirection::SlightlyRight)).unwrap();
        assert_eq!(json, "\"slightly right\"");
        let json = serde_json::to_string(&Direction::Turn(TurnDirection::Sharp(Side::Left))).unwrap();
        assert_eq!(json, "\"sharp_left\"");
    }
}
