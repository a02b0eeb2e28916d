use std::collections::HashSet;

use crate::games::SessionRng;
use crate::{log, warn};
use super::board::Board;
use super::types::{Anchor, Cell};

/// Visual shape of an obstacle. Purely cosmetic; collision is per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleShape {
    Cube,
    Pyramid,
    Cylinder,
    Sphere,
}

impl ObstacleShape {
    const ALL: [ObstacleShape; 4] = [
        ObstacleShape::Cube,
        ObstacleShape::Pyramid,
        ObstacleShape::Cylinder,
        ObstacleShape::Sphere,
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub cell: Cell,
    pub shape: ObstacleShape,
    pub anchor: Anchor,
}

#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    occupied: HashSet<Cell>,
}

impl ObstacleField {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Best effort: stops after `count * attempts_per_obstacle` draws and
    /// keeps whatever was placed.
    pub fn generate(
        board: &Board,
        count: usize,
        protected: &HashSet<Cell>,
        attempts_per_obstacle: usize,
        rng: &mut SessionRng,
    ) -> Self {
        let mut field = Self::empty();
        let max_attempts = count.saturating_mul(attempts_per_obstacle);
        let mut attempts = 0;

        while field.len() < count && attempts < max_attempts {
            attempts += 1;
            let cell = Cell::new(
                rng.random_range(0..board.size()),
                rng.random_range(0..board.size()),
            );
            if protected.contains(&cell) || field.contains(cell) {
                continue;
            }
            let shape = *rng.choose(&ObstacleShape::ALL).unwrap_or(&ObstacleShape::Cube);
            field.insert(board, cell, shape);
        }

        if field.len() < count {
            warn!(
                "Placed {} of {} obstacles after {} attempts",
                field.len(),
                count,
                attempts
            );
        }
        field
    }

    fn insert(&mut self, board: &Board, cell: Cell, shape: ObstacleShape) {
        self.occupied.insert(cell);
        self.obstacles.push(Obstacle {
            cell,
            shape,
            anchor: board.anchor(cell),
        });
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.obstacles.iter().map(|o| o.cell)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Moves one randomly chosen obstacle to a free cell. `blocked` reports
    /// cells owned by someone else (snake, apple, head lane).
    pub fn relocate_one(
        &mut self,
        board: &Board,
        blocked: impl Fn(Cell) -> bool,
        attempts: usize,
        rng: &mut SessionRng,
    ) -> Option<(Cell, Cell)> {
        if self.obstacles.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.obstacles.len());

        for _ in 0..attempts {
            let target = Cell::new(
                rng.random_range(0..board.size()),
                rng.random_range(0..board.size()),
            );
            if blocked(target) || self.contains(target) {
                continue;
            }

            let obstacle = &mut self.obstacles[index];
            let from = obstacle.cell;
            obstacle.cell = target;
            obstacle.anchor = board.anchor(target);
            self.occupied.remove(&from);
            self.occupied.insert(target);
            log!("Obstacle moved from ({}, {}) to ({}, {})", from.x, from.z, target.x, target.z);
            return Some((from, target));
        }
        None
    }

    /// Pulls out-of-range obstacles back onto the board and refreshes their
    /// anchors. Returns `(before, after)` for each repaired obstacle.
    pub fn clamp_into(&mut self, board: &Board) -> Vec<(Cell, Cell)> {
        let mut repaired = Vec::new();
        for obstacle in &mut self.obstacles {
            if board.contains(obstacle.cell) {
                continue;
            }
            let clamped = board.clamp_to_board(obstacle.cell);
            repaired.push((obstacle.cell, clamped));
            obstacle.cell = clamped;
            obstacle.anchor = board.anchor(clamped);
        }
        if !repaired.is_empty() {
            self.occupied = self.obstacles.iter().map(|o| o.cell).collect();
        }
        repaired
    }

    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, board: &Board, cell: Cell) {
        self.insert(board, cell, ObstacleShape::Cube);
    }
}
