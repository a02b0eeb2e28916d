use std::collections::{HashMap, HashSet};

use crate::games::SessionRng;
use crate::warn;
use super::board::Board;
use super::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarrierKind {
    Boundary,
    Complex,
    RandomShape,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Barrier {
    /// Ring of cells just outside the grid (`x = -1`, `x = N`, `z = -1`, `z = N`).
    Boundary(Vec<Cell>),
    /// A single stacked block on an in-bounds cell.
    Complex(Cell),
    RandomShape(Vec<Cell>),
}

impl Barrier {
    pub fn kind(&self) -> BarrierKind {
        match self {
            Barrier::Boundary(_) => BarrierKind::Boundary,
            Barrier::Complex(_) => BarrierKind::Complex,
            Barrier::RandomShape(_) => BarrierKind::RandomShape,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        match self {
            Barrier::Boundary(cells) | Barrier::RandomShape(cells) => cells,
            Barrier::Complex(cell) => std::slice::from_ref(cell),
        }
    }

    fn boundary(board: &Board) -> Self {
        let n = board.size();
        let mut cells = Vec::with_capacity((4 * (n + 1)) as usize);
        for i in -1..=n {
            cells.push(Cell::new(i, -1));
            cells.push(Cell::new(i, n));
        }
        for z in 0..n {
            cells.push(Cell::new(-1, z));
            cells.push(Cell::new(n, z));
        }
        Barrier::Boundary(cells)
    }
}

/// Offsets of the polyomino patterns used for random-shape barriers.
const SHAPE_PATTERNS: [&[(i32, i32)]; 7] = [
    &[(0, 0), (1, 0)],
    &[(0, 0), (1, 0), (2, 0)],
    &[(0, 0), (0, 1), (0, 2), (1, 2)],
    &[(0, 0), (1, 0), (2, 0), (1, 1)],
    &[(1, 0), (2, 0), (0, 1), (1, 1)],
    &[(0, 0), (1, 0), (0, 1), (1, 1)],
    &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
];

fn rotate_quarter_turns(offset: (i32, i32), turns: u8) -> (i32, i32) {
    (0..turns % 4).fold(offset, |(x, z), _| (-z, x))
}

/// Registry of every barrier active for a level.
#[derive(Clone, Debug, Default)]
pub struct BarrierField {
    barriers: Vec<Barrier>,
    occupied: HashMap<Cell, BarrierKind>,
}

impl BarrierField {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, barrier: Barrier) {
        let kind = barrier.kind();
        for cell in barrier.cells() {
            self.occupied.insert(*cell, kind);
        }
        self.barriers.push(barrier);
    }

    pub fn add_boundary(&mut self, board: &Board) {
        self.push(Barrier::boundary(board));
    }

    /// Best effort: returns how many complex barriers were actually placed.
    pub fn add_complex(
        &mut self,
        board: &Board,
        count: usize,
        protected: &HashSet<Cell>,
        attempts_per_barrier: usize,
        rng: &mut SessionRng,
    ) -> usize {
        let max_attempts = count.saturating_mul(attempts_per_barrier);
        let mut placed = 0;
        let mut attempts = 0;

        while placed < count && attempts < max_attempts {
            attempts += 1;
            let cell = Cell::new(
                rng.random_range(0..board.size()),
                rng.random_range(0..board.size()),
            );
            if protected.contains(&cell) || self.contains(cell) {
                continue;
            }
            self.push(Barrier::Complex(cell));
            placed += 1;
        }

        if placed < count {
            warn!("Placed {} of {} complex barriers", placed, count);
        }
        placed
    }

    /// Best effort: shapes that leave the grid, touch `protected` or overlap
    /// an earlier shape are redrawn until the attempt budget runs out.
    pub fn add_random_shapes(
        &mut self,
        board: &Board,
        count: usize,
        protected: &HashSet<Cell>,
        attempts_per_shape: usize,
        rng: &mut SessionRng,
    ) -> usize {
        let max_attempts = count.saturating_mul(attempts_per_shape);
        let mut placed = 0;
        let mut attempts = 0;

        while placed < count && attempts < max_attempts {
            attempts += 1;
            let Some(pattern) = rng.choose(&SHAPE_PATTERNS) else {
                break;
            };
            let turns: u8 = rng.random_range(0..4);
            let origin = Cell::new(
                rng.random_range(0..board.size()),
                rng.random_range(0..board.size()),
            );

            let cells: Vec<Cell> = pattern
                .iter()
                .map(|&offset| {
                    let (dx, dz) = rotate_quarter_turns(offset, turns);
                    origin.offset(dx, dz)
                })
                .collect();

            let fits = cells
                .iter()
                .all(|c| board.contains(*c) && !protected.contains(c) && !self.contains(*c));
            if !fits {
                continue;
            }
            self.push(Barrier::RandomShape(cells));
            placed += 1;
        }

        if placed < count {
            warn!("Placed {} of {} random barrier shapes", placed, count);
        }
        placed
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.occupied.contains_key(&cell)
    }

    pub fn kind_at(&self, cell: Cell) -> Option<BarrierKind> {
        self.occupied.get(&cell).copied()
    }

    pub fn barriers(&self) -> &[Barrier] {
        &self.barriers
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, BarrierKind)> + '_ {
        self.barriers
            .iter()
            .flat_map(|b| b.cells().iter().map(move |c| (*c, b.kind())))
    }

    pub fn count_of(&self, kind: BarrierKind) -> usize {
        self.barriers.iter().filter(|b| b.kind() == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.barriers.is_empty()
    }

    /// Clamps stray in-bounds barrier cells back onto the grid. Boundary
    /// cells live outside the grid on purpose and are left alone.
    pub fn clamp_into(&mut self, board: &Board) -> Vec<(Cell, Cell)> {
        let mut repaired = Vec::new();
        for barrier in &mut self.barriers {
            let cells: &mut [Cell] = match barrier {
                Barrier::Boundary(_) => continue,
                Barrier::Complex(cell) => std::slice::from_mut(cell),
                Barrier::RandomShape(cells) => cells.as_mut_slice(),
            };
            for cell in cells.iter_mut().filter(|c| !board.contains(**c)) {
                let clamped = board.clamp_to_board(*cell);
                repaired.push((*cell, clamped));
                *cell = clamped;
            }
        }

        if !repaired.is_empty() {
            let barriers = std::mem::take(&mut self.barriers);
            self.occupied.clear();
            for barrier in barriers {
                self.push(barrier);
            }
        }
        repaired
    }
}
