use common::games::snake::{CollisionReason, GameEvent, GameMode};
use common::log;

/// Score arithmetic lives here, outside the engine.
#[derive(Debug, Default)]
pub struct ScoreKeeper {
    pub score: u32,
    pub apples: u32,
    pub relocations: u32,
    pub collision: Option<CollisionReason>,
    pub board_filled: bool,
}

impl ScoreKeeper {
    fn points_per_apple(mode: GameMode) -> u32 {
        if mode.wraps_at_boundary() { 1 } else { 2 }
    }

    pub fn apply(&mut self, mode: GameMode, event: &GameEvent) {
        match event {
            GameEvent::ApplePickedUp { cell, grew } => {
                self.apples += 1;
                self.score += Self::points_per_apple(mode);
                log!(
                    "Apple at ({}, {}){}. Score: {}",
                    cell.x,
                    cell.z,
                    if *grew { "" } else { " at max length" },
                    self.score
                );
            }
            GameEvent::SnakeCollided(reason) => {
                self.collision = Some(*reason);
                log!("Round over: {:?}. Final score: {}", reason, self.score);
            }
            GameEvent::BoardFilled => {
                self.board_filled = true;
                log!("Board filled! Final score: {}", self.score);
            }
            GameEvent::ObstacleRelocated { .. } => {
                self.relocations += 1;
            }
        }
    }
}
