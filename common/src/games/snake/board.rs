use super::types::{Anchor, Cell};

pub const DEFAULT_BOARD_SIZE: i32 = 20;

/// Scene units per cell edge.
pub const CELL_SIZE: f32 = 1.0;

/// Square grid geometry. Pure and immutable: everything here is coordinate
/// arithmetic, no occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    size: i32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl Board {
    pub fn new(size: i32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn area(&self) -> usize {
        (self.size * self.size) as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.size).contains(&cell.x) && (0..self.size).contains(&cell.z)
    }

    pub fn clamp_to_board(&self, cell: Cell) -> Cell {
        Cell::new(cell.x.clamp(0, self.size - 1), cell.z.clamp(0, self.size - 1))
    }

    /// Moves each coordinate that left the grid to the opposite edge.
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell::new(cell.x.rem_euclid(self.size), cell.z.rem_euclid(self.size))
    }

    /// `(9, 9)` on a 20x20 board.
    pub fn center(&self) -> Cell {
        let mid = (self.size - 1) / 2;
        Cell::new(mid, mid)
    }

    /// Canonical row-major key for an in-bounds cell.
    pub fn cell_key(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.z * self.size + cell.x) as usize)
    }

    pub fn cell_from_key(&self, key: usize) -> Option<Cell> {
        if key >= self.area() {
            return None;
        }
        let key = key as i32;
        Some(Cell::new(key % self.size, key / self.size))
    }

    /// Row-major walk over every cell of the board.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |z| (0..self.size).map(move |x| Cell::new(x, z)))
    }

    pub fn anchor(&self, cell: Cell) -> Anchor {
        Anchor {
            x: self.coord_to_scene(cell.x),
            z: self.coord_to_scene(cell.z),
        }
    }

    /// Exact inverse of [`Board::anchor`] for every integer cell, including
    /// cells outside the grid.
    pub fn cell_at(&self, anchor: Anchor) -> Cell {
        Cell::new(self.scene_to_coord(anchor.x), self.scene_to_coord(anchor.z))
    }

    fn half_extent(&self) -> f32 {
        self.size as f32 / 2.0
    }

    fn coord_to_scene(&self, coord: i32) -> f32 {
        (coord as f32 - self.half_extent() + 0.5) * CELL_SIZE
    }

    fn scene_to_coord(&self, value: f32) -> i32 {
        (value / CELL_SIZE + self.half_extent() - 0.5).round() as i32
    }
}
