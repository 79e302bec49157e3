use std::fmt;

/// Unique identifier for any piece tracked by a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a team within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team{}", self.0)
    }
}

/// Which side of the conflict a team fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    pub fn opposing(self) -> Self {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }
}

/// Discrete grid position expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions.
    pub fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Position `steps` cells away along `direction`.
    pub fn step(self, direction: Direction, steps: i32) -> Position {
        Position::new(self.x + direction.dx * steps, self.y + direction.dy * steps)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal unit vector, or [`Direction::NONE`] when there is no heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const NONE: Self = Self { dx: 0, dy: 0 };
    pub const UP: Self = Self { dx: 0, dy: -1 };
    pub const DOWN: Self = Self { dx: 0, dy: 1 };
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };

    pub const CARDINALS: [Direction; 4] = [Self::UP, Self::RIGHT, Self::DOWN, Self::LEFT];

    /// Dominant-axis heading from `from` to `to`.
    ///
    /// The axis with the larger absolute delta wins; ties go to the vertical
    /// axis. Returns [`Direction::NONE`] when both positions are equal.
    pub fn between(from: Position, to: Position) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            Self::NONE
        } else if dx.abs() > dy.abs() {
            Self {
                dx: dx.signum(),
                dy: 0,
            }
        } else {
            Self {
                dx: 0,
                dy: dy.signum(),
            }
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}
