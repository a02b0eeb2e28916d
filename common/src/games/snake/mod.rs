mod apple;
mod arena;
mod auditor;
mod barriers;
mod board;
mod bot_controller;
mod game_state;
mod obstacles;
mod resolver;
mod settings;
mod snake;
mod types;

pub use apple::{ApplePlacement, ApplePlacer, PlacementTier};
pub use arena::Arena;
pub use auditor::{AuditReport, AuditTarget, Correction, audit};
pub use barriers::{Barrier, BarrierField, BarrierKind};
pub use board::{Board, CELL_SIZE, DEFAULT_BOARD_SIZE};
pub use bot_controller::{BotController, SnakeBotType};
pub use game_state::{GameEvent, GameSnapshot, GameStatus, SnakeGame};
pub use obstacles::{Obstacle, ObstacleField, ObstacleShape};
pub use resolver::{MoveContext, Outcome, advance};
pub use settings::{EngineSettings, LevelConfig};
pub use snake::Snake;
pub use types::{Anchor, Cell, CollisionReason, Direction, GameMode};
