//! Area shape predicates used by range and area-of-effect enumeration.

/// Range parameters handed to a shape predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeProps {
    pub range: u32,
    pub min_range: u32,
}

impl ShapeProps {
    pub const fn new(range: u32, min_range: u32) -> Self {
        Self { range, min_range }
    }
}

/// Filter applied to the offsets of a square window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Whole window, minus the inner `min_range` square.
    #[default]
    Square,
    /// Orthogonal rays only.
    Line,
    /// Diagonal rays only (`|dx| == |dy|`).
    Cross,
    /// Orthogonal and diagonal rays.
    Star,
    /// Manhattan annulus `min_range..=range`.
    Circle,
}

impl Shape {
    /// Returns true when the offset `(dx, dy)` belongs to the shape.
    pub fn accepts(self, dx: i32, dy: i32, props: ShapeProps) -> bool {
        let ax = dx.unsigned_abs();
        let ay = dy.unsigned_abs();
        let inside_min = ax < props.min_range && ay < props.min_range;
        match self {
            Shape::Square => !inside_min,
            Shape::Line => (dx == 0 || dy == 0) && !inside_min,
            Shape::Cross => ax == ay && !inside_min,
            Shape::Star => (dx == 0 || dy == 0 || ax == ay) && !inside_min,
            Shape::Circle => {
                let distance = ax + ay;
                distance <= props.range && distance >= props.min_range
            }
        }
    }
}
