use std::collections::HashSet;

use crate::games::SessionRng;
use super::barriers::{BarrierField, BarrierKind};
use super::board::Board;
use super::obstacles::ObstacleField;
use super::settings::{EngineSettings, LevelConfig};
use super::types::{Cell, CollisionReason, GameMode};

/// The entity registries of one level plus the mode deciding which of them
/// take part in collision checks.
#[derive(Clone, Debug)]
pub struct Arena {
    mode: GameMode,
    pub obstacles: ObstacleField,
    pub barriers: BarrierField,
}

impl Arena {
    pub fn new(mode: GameMode, obstacles: ObstacleField, barriers: BarrierField) -> Self {
        Self {
            mode,
            obstacles,
            barriers,
        }
    }

    pub fn open(mode: GameMode) -> Self {
        Self::new(mode, ObstacleField::empty(), BarrierField::empty())
    }

    /// Builds the registries the level's mode needs. `protected` cells are
    /// never occupied by generated entities.
    pub fn generate(
        board: &Board,
        level: &LevelConfig,
        settings: &EngineSettings,
        protected: &HashSet<Cell>,
        rng: &mut SessionRng,
    ) -> Self {
        let attempts = settings.placement_attempts_per_entity;
        let mut arena = Self::open(level.mode);

        match level.mode {
            GameMode::Classic => {}
            GameMode::Barriers | GameMode::Campaign => {
                arena.barriers.add_boundary(board);
                arena
                    .barriers
                    .add_complex(board, level.barrier_count, protected, attempts, rng);
            }
            GameMode::Obstacles => {
                arena.obstacles = ObstacleField::generate(
                    board,
                    level.obstacle_count,
                    protected,
                    attempts,
                    rng,
                );
            }
            GameMode::RandomBarriers => {
                arena
                    .barriers
                    .add_random_shapes(board, level.barrier_count, protected, attempts, rng);
            }
        }
        arena
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Collision produced by entering `cell`, considering only the
    /// registries active for the mode.
    pub fn collision_at(&self, cell: Cell) -> Option<CollisionReason> {
        if self.mode.uses_obstacles() && self.obstacles.contains(cell) {
            return Some(CollisionReason::Obstacle);
        }

        if self.mode.uses_fixed_barriers() || self.mode.uses_random_barriers() {
            return match self.barriers.kind_at(cell)? {
                BarrierKind::Boundary => Some(CollisionReason::Barrier),
                BarrierKind::Complex | BarrierKind::RandomShape => Some(CollisionReason::Barrier),
            };
        }
        None
    }

    /// Whether any registry holds `cell`, active for the mode or not.
    pub fn occupies(&self, cell: Cell) -> bool {
        self.obstacles.contains(cell) || self.barriers.contains(cell)
    }
}
