use crate::games::SessionRng;
use super::game_state::SnakeGame;
use super::types::{Cell, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnakeBotType {
    Random,
    Greedy,
}

pub struct BotController;

impl BotController {
    /// Picks the heading for the next tick, or `None` when every legal move
    /// collides.
    pub fn calculate_move(
        bot_type: SnakeBotType,
        game: &SnakeGame,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        let safe = safe_moves(game);
        if safe.is_empty() {
            return None;
        }

        match bot_type {
            SnakeBotType::Random => rng.choose(&safe).map(|(direction, _)| *direction),
            SnakeBotType::Greedy => calculate_greedy_move(game, &safe),
        }
    }
}

fn next_cell(game: &SnakeGame, direction: Direction) -> Option<Cell> {
    let board = game.board();
    let cell = game.snake().head().stepped(direction);
    if board.contains(cell) {
        Some(cell)
    } else if game.level().mode.wraps_at_boundary() {
        Some(board.wrap(cell))
    } else {
        None
    }
}

fn is_safe(game: &SnakeGame, cell: Cell) -> bool {
    !game.snake().contains(cell) && game.arena().collision_at(cell).is_none()
}

fn safe_moves(game: &SnakeGame) -> Vec<(Direction, Cell)> {
    let heading = game.snake().heading();
    Direction::ALL
        .into_iter()
        .filter(|direction| !direction.is_opposite(&heading))
        .filter_map(|direction| next_cell(game, direction).map(|cell| (direction, cell)))
        .filter(|(_, cell)| is_safe(game, *cell))
        .collect()
}

fn axis_distance(a: i32, b: i32, size: i32, wraps: bool) -> i32 {
    let d = (a - b).abs();
    if wraps { d.min(size - d) } else { d }
}

fn distance(game: &SnakeGame, from: Cell, to: Cell) -> i32 {
    let size = game.board().size();
    let wraps = game.level().mode.wraps_at_boundary();
    axis_distance(from.x, to.x, size, wraps) + axis_distance(from.z, to.z, size, wraps)
}

fn free_neighbours(game: &SnakeGame, cell: Cell) -> usize {
    let board = game.board();
    let wraps = game.level().mode.wraps_at_boundary();
    Direction::ALL
        .into_iter()
        .filter_map(|direction| {
            let next = cell.stepped(direction);
            if board.contains(next) {
                Some(next)
            } else if wraps {
                Some(board.wrap(next))
            } else {
                None
            }
        })
        .filter(|next| is_safe(game, *next))
        .count()
}

fn calculate_greedy_move(game: &SnakeGame, safe: &[(Direction, Cell)]) -> Option<Direction> {
    let heading = game.snake().heading();
    let apple = game.apple();

    safe.iter()
        .min_by_key(|(direction, cell)| {
            let to_apple = apple.map(|a| distance(game, *cell, a)).unwrap_or(0);
            // Dead ends lose to any open cell, whatever the distance.
            let trapped = free_neighbours(game, *cell) == 0;
            (trapped, to_apple, *direction != heading)
        })
        .map(|(direction, _)| *direction)
}
