//! Board geometry: a fixed-size grid of cells.
//!
//! The board answers purely geometric questions (bounds, adjacency, square
//! windows filtered by a [`Shape`]) and stores the occupant back-references
//! and range marks that the movement and targeting layers maintain.

mod cell;
mod shape;
mod terrain;

pub use cell::{Cell, RangeMarks};
pub use shape::{Shape, ShapeProps};
pub use terrain::{Terrain, TerrainFlags, TerrainTable, TileCode};

use arrayvec::ArrayVec;

use crate::state::{Direction, Position};

/// Half-width of the square window enumerated for an area of `size`.
///
/// The window side is `2 * ceil((size - 1) / 2) + 1`, so even sizes round up
/// to the next odd window and sizes of 0 or 1 cover only the center.
pub const fn area_radius(size: u32) -> i32 {
    (size / 2) as i32
}

/// Fixed-size 2D array of cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board of open terrain.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_| Terrain::open())
    }

    /// Creates a board from descriptor rows.
    ///
    /// Rows or columns missing from `rows` fall back to open terrain; extra
    /// entries are ignored.
    pub fn from_codes(
        width: u32,
        height: u32,
        rows: &[Vec<TileCode>],
        table: &TerrainTable,
    ) -> Self {
        Self::from_fn(width, height, |position| {
            rows.get(position.y as usize)
                .and_then(|row| row.get(position.x as usize))
                .map(|code| table.resolve(*code))
                .unwrap_or_else(Terrain::open)
        })
    }

    fn from_fn(width: u32, height: u32, mut terrain: impl FnMut(Position) -> Terrain) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let position = Position::new(x, y);
                cells.push(Cell::new(position, terrain(position)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    /// Bounds-checked lookup; `None` outside `[0, width) × [0, height)`.
    pub fn at(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|index| &self.cells[index])
    }

    pub(crate) fn at_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index(position).map(move |index| &mut self.cells[index])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Enumerates the square window around `center` for an area of `size`.
    ///
    /// When a shape is supplied, offsets are filtered before lookup. Offsets
    /// that fall outside the board yield `None` rather than being skipped.
    pub fn area(
        &self,
        center: Position,
        size: u32,
        shape: Option<(Shape, ShapeProps)>,
    ) -> Vec<Option<&Cell>> {
        self.area_positions(center, size, shape)
            .into_iter()
            .map(|position| position.and_then(|position| self.at(position)))
            .collect()
    }

    /// Same window as [`Board::area`], yielding positions.
    pub fn area_positions(
        &self,
        center: Position,
        size: u32,
        shape: Option<(Shape, ShapeProps)>,
    ) -> Vec<Option<Position>> {
        let radius = area_radius(size);
        let mut out = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if let Some((shape, props)) = shape
                    && !shape.accepts(dx, dy, props)
                {
                    continue;
                }
                let position = Position::new(center.x + dx, center.y + dy);
                out.push(self.contains(position).then_some(position));
            }
        }
        out
    }

    /// Orthogonal neighbours that exist on the board.
    pub fn adjacent(&self, position: Position) -> ArrayVec<&Cell, 4> {
        Direction::CARDINALS
            .iter()
            .filter_map(|direction| self.at(position.step(*direction, 1)))
            .collect()
    }

    pub fn direction(&self, from: Position, to: Position) -> Direction {
        Direction::between(from, to)
    }

    pub fn distance(&self, a: Position, b: Position) -> u32 {
        a.distance(b)
    }

    /// Largest Manhattan distance possible on this board plus one.
    pub fn max_distance(&self) -> u32 {
        self.width + self.height
    }

    pub fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            cell.marks = RangeMarks::default();
        }
    }

    /// Cells currently painted in range.
    pub fn painted(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.marks.in_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_is_bounds_checked() {
        let board = Board::new(4, 3);
        assert!(board.at(Position::new(3, 2)).is_some());
        assert!(board.at(Position::new(4, 0)).is_none());
        assert!(board.at(Position::new(0, -1)).is_none());
    }

    #[test]
    fn area_window_side_rounds_up_to_odd() {
        let board = Board::new(9, 9);
        let center = Position::new(4, 4);
        assert_eq!(board.area(center, 0, None).len(), 1);
        assert_eq!(board.area(center, 1, None).len(), 1);
        assert_eq!(board.area(center, 2, None).len(), 9);
        assert_eq!(board.area(center, 3, None).len(), 9);
        assert_eq!(board.area(center, 4, None).len(), 25);
    }

    #[test]
    fn area_reports_off_board_entries_as_none() {
        let board = Board::new(5, 5);
        let window = board.area(Position::new(0, 0), 3, None);
        assert_eq!(window.len(), 9);
        assert_eq!(window.iter().filter(|cell| cell.is_none()).count(), 5);
    }

    #[test]
    fn area_shape_filters_before_lookup() {
        let board = Board::new(9, 9);
        let line = board.area(
            Position::new(4, 4),
            5,
            Some((Shape::Line, ShapeProps::new(2, 1))),
        );
        assert_eq!(line.len(), 8);
        assert!(line.iter().all(|cell| cell.is_some()));
    }

    #[test]
    fn adjacent_omits_off_board() {
        let board = Board::new(3, 3);
        assert_eq!(board.adjacent(Position::new(0, 0)).len(), 2);
        assert_eq!(board.adjacent(Position::new(1, 1)).len(), 4);
    }

    #[test]
    fn from_codes_pads_missing_rows() {
        let table = TerrainTable::standard();
        let rows = vec![vec![TileCode::new(0, TerrainTable::DECORATION_ROCK)]];
        let board = Board::from_codes(2, 2, &rows, &table);
        assert!(board.at(Position::new(0, 0)).is_some_and(Cell::blocks_move));
        assert!(board.at(Position::new(1, 1)).is_some_and(|cell| !cell.blocks_move()));
    }
}
