use std::collections::HashSet;
use std::time::Duration;

use crate::games::SessionRng;
use crate::log;
use super::apple::{ApplePlacement, ApplePlacer};
use super::arena::Arena;
use super::auditor::{self, AuditReport, AuditTarget};
use super::barriers::BarrierKind;
use super::board::Board;
use super::obstacles::ObstacleShape;
use super::resolver::{self, MoveContext, Outcome};
use super::settings::{EngineSettings, LevelConfig};
use super::snake::Snake;
use super::types::{Anchor, Cell, CollisionReason, Direction, GameMode};

const START_HEADING: Direction = Direction::Right;
const SPAWN_LANE: i32 = 3;
const RELOCATION_LANE: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Alive,
    Terminated(CollisionReason),
    Victory,
}

/// Notifications for the score collaborator. The engine keeps no score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ApplePickedUp { cell: Cell, grew: bool },
    SnakeCollided(CollisionReason),
    BoardFilled,
    ObstacleRelocated { from: Cell, to: Cell },
}

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub board_size: i32,
    pub mode: GameMode,
    pub snake: Vec<Cell>,
    pub heading: Direction,
    pub obstacles: Vec<(Cell, ObstacleShape)>,
    pub barriers: Vec<(Cell, BarrierKind)>,
    pub apple: Option<Cell>,
    pub status: GameStatus,
    pub paused: bool,
    pub apples_eaten: u32,
    pub ticks: u64,
}

/// Owns the whole simulation between ticks. Renderers read snapshots;
/// only the controller mutates.
pub struct SnakeGame {
    level: LevelConfig,
    settings: EngineSettings,
    board: Board,
    snake: Snake,
    segment_anchors: Vec<Anchor>,
    arena: Arena,
    apple: Option<Cell>,
    status: GameStatus,
    paused: bool,
    rng: SessionRng,
    apples_eaten: u32,
    ticks: u64,
    since_last_move: Duration,
    since_last_audit: Duration,
}

impl SnakeGame {
    pub fn new(level: LevelConfig, settings: EngineSettings, mut rng: SessionRng) -> Self {
        let board = Board::new(level.board_size);
        let snake = Snake::new(board.center(), START_HEADING, settings.initial_length, &board);

        let mut protected: HashSet<Cell> = snake.cells().collect();
        let mut ahead = snake.head();
        for _ in 0..SPAWN_LANE {
            ahead = board.wrap(ahead.stepped(START_HEADING));
            protected.insert(ahead);
        }

        let arena = Arena::generate(&board, &level, &settings, &protected, &mut rng);
        log!(
            "New {:?} round on {}x{} board (seed {})",
            level.mode,
            board.size(),
            board.size(),
            rng.seed()
        );
        Self::from_parts(level, settings, snake, arena, None, rng)
    }

    /// Assembles a game from prepared parts. A missing apple is placed
    /// immediately.
    pub fn from_parts(
        level: LevelConfig,
        settings: EngineSettings,
        snake: Snake,
        arena: Arena,
        apple: Option<Cell>,
        rng: SessionRng,
    ) -> Self {
        let board = Board::new(level.board_size);
        let segment_anchors = snake.cells().map(|c| board.anchor(c)).collect();
        let mut game = Self {
            level,
            settings,
            board,
            snake,
            segment_anchors,
            arena,
            apple,
            status: GameStatus::Alive,
            paused: false,
            rng,
            apples_eaten: 0,
            ticks: 0,
            since_last_move: Duration::ZERO,
            since_last_audit: Duration::ZERO,
        };
        if game.apple.is_none() {
            game.respawn_apple();
        }
        game
    }

    /// Rebuilds every registry and the snake for `level`. The new state is
    /// assembled completely before it replaces the old one.
    pub fn reset(&mut self, level: LevelConfig) {
        let rng = SessionRng::new(self.rng.random());
        let fresh = Self::new(level, self.settings.clone(), rng);
        *self = fresh;
    }

    pub fn restart(&mut self) {
        self.reset(self.level.clone());
    }

    pub fn queue_turn(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Alive {
            return false;
        }
        self.snake.request_turn(direction)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.tick_interval(self.apples_eaten)
    }

    /// Frame entry point. Advances at most one tick, and only while
    /// unpaused, alive and once the tick interval has elapsed since the
    /// last move.
    pub fn update(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        if self.paused || self.status != GameStatus::Alive {
            return Vec::new();
        }

        self.since_last_move += elapsed;
        self.since_last_audit += elapsed;

        if self.since_last_audit >= self.settings.audit_interval() {
            self.since_last_audit = Duration::ZERO;
            self.audit();
        }

        if self.since_last_move < self.tick_interval() {
            return Vec::new();
        }
        self.since_last_move = Duration::ZERO;
        self.step()
    }

    /// Runs exactly one tick regardless of timing.
    pub fn step(&mut self) -> Vec<GameEvent> {
        if self.status != GameStatus::Alive {
            return Vec::new();
        }

        let outcome = {
            let ctx = MoveContext {
                board: &self.board,
                arena: &self.arena,
                apple: self.apple,
                max_length: self.settings.max_length,
            };
            resolver::advance(&self.snake, self.snake.pending_heading(), &ctx)
        };
        self.ticks += 1;

        match outcome {
            Outcome::Collided(reason) => {
                self.status = GameStatus::Terminated(reason);
                log!(
                    "Snake collided ({:?}) at tick {} with length {}",
                    reason,
                    self.ticks,
                    self.snake.len()
                );
                vec![GameEvent::SnakeCollided(reason)]
            }
            Outcome::Moved {
                snake,
                ate_apple,
                grew,
            } => {
                self.snake = snake;
                self.segment_anchors
                    .insert(0, self.board.anchor(self.snake.head()));
                self.segment_anchors.truncate(self.snake.len());

                if !ate_apple {
                    return Vec::new();
                }
                self.on_apple_eaten(grew)
            }
        }
    }

    fn on_apple_eaten(&mut self, grew: bool) -> Vec<GameEvent> {
        let cell = self.snake.head();
        self.apples_eaten += 1;
        let mut events = vec![GameEvent::ApplePickedUp { cell, grew }];

        let every = self.settings.obstacle_relocate_every;
        if self.level.mode.uses_obstacles() && every > 0 && self.apples_eaten % every == 0 {
            if let Some((from, to)) = self.relocate_obstacle() {
                events.push(GameEvent::ObstacleRelocated { from, to });
            }
        }

        if !self.respawn_apple() {
            events.push(GameEvent::BoardFilled);
        }
        events
    }

    fn relocate_obstacle(&mut self) -> Option<(Cell, Cell)> {
        let mut lane = Vec::with_capacity(RELOCATION_LANE as usize);
        let mut ahead = self.snake.head();
        for _ in 0..RELOCATION_LANE {
            ahead = ahead.stepped(self.snake.heading());
            lane.push(ahead);
        }

        let snake = &self.snake;
        let apple = self.apple;
        self.arena.obstacles.relocate_one(
            &self.board,
            |cell| snake.contains(cell) || lane.contains(&cell) || apple == Some(cell),
            self.settings.placement_attempts_per_entity,
            &mut self.rng,
        )
    }

    /// Returns false and switches to victory when no cell is left.
    fn respawn_apple(&mut self) -> bool {
        let placement = ApplePlacer {
            board: &self.board,
            snake: &self.snake,
            arena: &self.arena,
            sample_attempts: self.settings.apple_sample_attempts,
            victory_fill_ratio: self.settings.victory_fill_ratio,
        }
        .place(&mut self.rng);

        match placement {
            ApplePlacement::Placed(cell, _) => {
                self.apple = Some(cell);
                true
            }
            ApplePlacement::BoardFull => {
                self.apple = None;
                self.status = GameStatus::Victory;
                log!("Board filled after {} apples", self.apples_eaten);
                false
            }
        }
    }

    pub fn audit(&mut self) -> AuditReport {
        auditor::audit(AuditTarget {
            board: &self.board,
            snake: &mut self.snake,
            segment_anchors: &mut self.segment_anchors,
            arena: &mut self.arena,
            apple: &mut self.apple,
            max_length: self.settings.max_length,
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board_size: self.board.size(),
            mode: self.level.mode,
            snake: self.snake.cells().collect(),
            heading: self.snake.heading(),
            obstacles: self
                .arena
                .obstacles
                .obstacles()
                .iter()
                .map(|o| (o.cell, o.shape))
                .collect(),
            barriers: self.arena.barriers.cells().collect(),
            apple: self.apple,
            status: self.status,
            paused: self.paused,
            apples_eaten: self.apples_eaten,
            ticks: self.ticks,
        }
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn segment_anchors(&self) -> &[Anchor] {
        &self.segment_anchors
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn apple(&self) -> Option<Cell> {
        self.apple
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn apples_eaten(&self) -> u32 {
        self.apples_eaten
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    pub(crate) fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::barriers::BarrierField;
    use crate::games::snake::obstacles::ObstacleField;

    fn level(mode: GameMode) -> LevelConfig {
        LevelConfig {
            mode,
            ..LevelConfig::default()
        }
    }

    fn scenario(mode: GameMode, cells: Vec<Cell>, heading: Direction, apple: Cell) -> SnakeGame {
        SnakeGame::from_parts(
            level(mode),
            EngineSettings::default(),
            Snake::from_cells(cells, heading),
            Arena::open(mode),
            Some(apple),
            SessionRng::new(42),
        )
    }

    fn line() -> Vec<Cell> {
        (5..=9).rev().map(|x| Cell::new(x, 9)).collect()
    }

    #[test]
    fn test_new_game_starts_centered() {
        let game = SnakeGame::new(level(GameMode::Classic), EngineSettings::default(), SessionRng::new(42));
        let snapshot = game.snapshot();
        assert_eq!(snapshot.snake, line());
        assert_eq!(snapshot.heading, Direction::Right);
        assert_eq!(snapshot.status, GameStatus::Alive);
        let apple = snapshot.apple.unwrap();
        assert!(!snapshot.snake.contains(&apple));
        assert_eq!(game.segment_anchors().len(), 5);
    }

    #[test]
    fn test_spawn_lane_is_kept_clear() {
        for mode in [GameMode::Barriers, GameMode::Obstacles, GameMode::RandomBarriers] {
            for seed in 0..20 {
                let game = SnakeGame::new(
                    LevelConfig {
                        mode,
                        obstacle_count: 80,
                        barrier_count: 40,
                        board_size: 20,
                    },
                    EngineSettings::default(),
                    SessionRng::new(seed),
                );
                for x in 5..=12 {
                    assert!(!game.arena().occupies(Cell::new(x, 9)), "{:?} seed {}", mode, seed);
                }
            }
        }
    }

    #[test]
    fn test_eating_apple_scenario() {
        let mut game = scenario(GameMode::Classic, line(), Direction::Right, Cell::new(10, 9));
        let events = game.step();

        assert_eq!(
            events[0],
            GameEvent::ApplePickedUp {
                cell: Cell::new(10, 9),
                grew: true,
            }
        );
        assert_eq!(game.snake().len(), 6);
        assert_eq!(game.snake().head(), Cell::new(10, 9));
        assert_eq!(game.segment_anchors().len(), 6);
        assert_eq!(game.segment_anchors()[0], game.board().anchor(Cell::new(10, 9)));
        let apple = game.apple().unwrap();
        assert!(!game.snake().contains(apple));
        assert_eq!(game.apples_eaten(), 1);
    }

    #[test]
    fn test_reverse_request_is_rejected() {
        let mut game = scenario(GameMode::Classic, line(), Direction::Right, Cell::new(0, 0));
        assert!(!game.queue_turn(Direction::Left));
        game.step();
        assert_eq!(game.snake().heading(), Direction::Right);
        assert_eq!(game.snake().head(), Cell::new(10, 9));
    }

    #[test]
    fn test_buffered_turn_applies_on_next_tick_only() {
        let mut game = scenario(GameMode::Classic, line(), Direction::Right, Cell::new(0, 0));
        assert!(game.queue_turn(Direction::Up));
        assert_eq!(game.snake().heading(), Direction::Right);
        assert!(game.queue_turn(Direction::Down));

        game.step();
        assert_eq!(game.snake().heading(), Direction::Down);
        assert_eq!(game.snake().head(), Cell::new(9, 10));
        assert_eq!(game.snake().pending_heading(), None);
    }

    #[test]
    fn test_out_of_bounds_terminates_barrier_mode() {
        let mut game = scenario(
            GameMode::Barriers,
            vec![Cell::new(0, 5), Cell::new(1, 5), Cell::new(2, 5)],
            Direction::Left,
            Cell::new(10, 10),
        );
        let events = game.step();
        assert_eq!(events, vec![GameEvent::SnakeCollided(CollisionReason::OutOfBounds)]);
        assert_eq!(game.status(), GameStatus::Terminated(CollisionReason::OutOfBounds));

        assert!(game.step().is_empty());
        assert!(!game.queue_turn(Direction::Up));
        assert_eq!(game.snake().head(), Cell::new(0, 5));
    }

    #[test]
    fn test_update_respects_interval_and_pause() {
        let mut game = scenario(GameMode::Classic, line(), Direction::Right, Cell::new(0, 0));
        game.update(Duration::from_millis(100));
        assert_eq!(game.ticks(), 0);
        game.update(Duration::from_millis(60));
        assert_eq!(game.ticks(), 1);

        game.pause();
        game.update(Duration::from_secs(5));
        assert_eq!(game.ticks(), 1);
        game.toggle_pause();
        assert!(!game.is_paused());
        game.update(Duration::from_millis(150));
        assert_eq!(game.ticks(), 2);
    }

    #[test]
    fn test_update_runs_audit_on_cadence() {
        let settings = EngineSettings {
            base_tick_ms: 10_000,
            min_tick_ms: 10_000,
            ..EngineSettings::default()
        };
        let mut game = SnakeGame::from_parts(
            level(GameMode::Classic),
            settings,
            Snake::from_cells(line(), Direction::Right),
            Arena::open(GameMode::Classic),
            Some(Cell::new(0, 0)),
            SessionRng::new(42),
        );
        game.snake_mut().set_cell(0, Cell::new(-7, 9));

        game.update(Duration::from_millis(1999));
        assert_eq!(game.snake().head(), Cell::new(-7, 9));

        game.update(Duration::from_millis(1));
        assert_eq!(game.snake().head(), Cell::new(9, 9));
        assert_eq!(game.snake().cell(1), Some(Cell::new(8, 9)));
        assert_eq!(game.ticks(), 0);
    }

    #[test]
    fn test_tick_interval_shrinks_with_apples() {
        let mut game = scenario(GameMode::Classic, line(), Direction::Right, Cell::new(10, 9));
        let before = game.tick_interval();
        game.step();
        assert!(game.tick_interval() < before);
    }

    #[test]
    fn test_board_fill_is_victory() {
        // Serpentine body covering all but (0, 4) and (1, 4), head at (2, 4)
        // travelling left.
        let mut path: Vec<Cell> = Vec::new();
        for z in 0..5 {
            let xs: Vec<i32> = if z % 2 == 0 { (0..5).rev().collect() } else { (0..5).collect() };
            path.extend(xs.into_iter().map(|x| Cell::new(x, z)));
        }
        let snake_cells: Vec<Cell> = path.iter().rev().skip(2).copied().collect();
        assert_eq!(snake_cells[0], Cell::new(2, 4));
        assert_eq!(snake_cells[1], Cell::new(3, 4));

        let mut game = SnakeGame::from_parts(
            LevelConfig {
                mode: GameMode::Classic,
                obstacle_count: 0,
                barrier_count: 0,
                board_size: 5,
            },
            EngineSettings {
                victory_fill_ratio: 1.0,
                ..EngineSettings::default()
            },
            Snake::from_cells(snake_cells, Direction::Left),
            Arena::open(GameMode::Classic),
            Some(Cell::new(1, 4)),
            SessionRng::new(42),
        );

        let events = game.step();
        assert_eq!(events.len(), 1);
        assert_eq!(game.apple(), Some(Cell::new(0, 4)));

        let events = game.step();
        assert!(events.contains(&GameEvent::BoardFilled));
        assert_eq!(game.status(), GameStatus::Victory);
        assert_eq!(game.apple(), None);
        assert_eq!(game.snake().len(), 25);
    }

    #[test]
    fn test_obstacles_relocate_after_pickups() {
        let board = Board::new(20);
        let mut obstacles = ObstacleField::empty();
        obstacles.insert_unchecked(&board, Cell::new(2, 2));
        let arena = Arena::new(GameMode::Obstacles, obstacles, BarrierField::empty());
        let settings = EngineSettings {
            obstacle_relocate_every: 1,
            ..EngineSettings::default()
        };
        let mut game = SnakeGame::from_parts(
            level(GameMode::Obstacles),
            settings,
            Snake::from_cells(line(), Direction::Right),
            arena,
            Some(Cell::new(10, 9)),
            SessionRng::new(42),
        );

        let events = game.step();
        let relocated = events
            .iter()
            .find_map(|e| match e {
                GameEvent::ObstacleRelocated { from, to } => Some((*from, *to)),
                _ => None,
            })
            .unwrap();
        assert_eq!(relocated.0, Cell::new(2, 2));
        assert!(game.arena().obstacles.contains(relocated.1));
        assert!(!game.snake().contains(relocated.1));
        assert_ne!(game.apple(), Some(relocated.1));
    }

    #[test]
    fn test_reset_rebuilds_for_new_mode() {
        let mut game = scenario(GameMode::Classic, line(), Direction::Right, Cell::new(10, 9));
        game.step();
        game.pause();

        game.reset(LevelConfig {
            mode: GameMode::Barriers,
            obstacle_count: 0,
            barrier_count: 5,
            board_size: 20,
        });
        assert_eq!(game.level().mode, GameMode::Barriers);
        assert_eq!(game.apples_eaten(), 0);
        assert_eq!(game.ticks(), 0);
        assert!(!game.is_paused());
        assert_eq!(game.snake().len(), 5);
        assert_eq!(game.arena().barriers.count_of(BarrierKind::Complex), 5);
    }

    #[test]
    fn test_length_never_exceeds_cap() {
        let settings = EngineSettings {
            max_length: 8,
            ..EngineSettings::default()
        };
        let mut game = SnakeGame::from_parts(
            level(GameMode::Classic),
            settings,
            Snake::from_cells(line(), Direction::Right),
            Arena::open(GameMode::Classic),
            None,
            SessionRng::new(7),
        );
        for _ in 0..20 {
            let head = game.snake().head();
            let next = game.board().wrap(head.stepped(game.snake().heading()));
            game.apple = Some(next);
            game.step();
            assert!(game.snake().len() <= 8);
        }
        assert_eq!(game.status(), GameStatus::Alive);
        assert_eq!(game.snake().len(), 8);
    }
}
