use crate::games::SessionRng;
use crate::{log, warn};
use super::arena::Arena;
use super::board::Board;
use super::snake::Snake;
use super::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementTier {
    Sampled,
    Enumerated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplePlacement {
    Placed(Cell, PlacementTier),
    /// No free cell left, or the snake reached the victory fill ratio.
    BoardFull,
}

impl ApplePlacement {
    pub fn cell(&self) -> Option<Cell> {
        match self {
            ApplePlacement::Placed(cell, _) => Some(*cell),
            ApplePlacement::BoardFull => None,
        }
    }
}

pub struct ApplePlacer<'a> {
    pub board: &'a Board,
    pub snake: &'a Snake,
    pub arena: &'a Arena,
    pub sample_attempts: usize,
    pub victory_fill_ratio: f32,
}

impl ApplePlacer<'_> {
    fn is_free(&self, cell: Cell) -> bool {
        !self.snake.contains(cell) && !self.arena.occupies(cell)
    }

    /// Random sampling first, then a row-major sweep over every free cell,
    /// and finally the board-full outcome. Never mutates the registries.
    pub fn place(&self, rng: &mut SessionRng) -> ApplePlacement {
        let fill = self.snake.len() as f32 / self.board.area() as f32;
        if fill >= self.victory_fill_ratio {
            log!("Snake fills {:.0}% of the board", fill * 100.0);
            return ApplePlacement::BoardFull;
        }

        for _ in 0..self.sample_attempts {
            let cell = Cell::new(
                rng.random_range(0..self.board.size()),
                rng.random_range(0..self.board.size()),
            );
            if self.is_free(cell) {
                return ApplePlacement::Placed(cell, PlacementTier::Sampled);
            }
        }

        let free: Vec<Cell> = self.board.cells().filter(|c| self.is_free(*c)).collect();
        match rng.choose(&free) {
            Some(cell) => {
                warn!(
                    "Apple sampling exhausted after {} attempts, picked from {} free cells",
                    self.sample_attempts,
                    free.len()
                );
                ApplePlacement::Placed(*cell, PlacementTier::Enumerated)
            }
            None => ApplePlacement::BoardFull,
        }
    }
}
