use super::arena::Arena;
use super::board::Board;
use super::snake::Snake;
use super::types::{Cell, CollisionReason, Direction};

/// Read-only facts a single move is resolved against.
pub struct MoveContext<'a> {
    pub board: &'a Board,
    pub arena: &'a Arena,
    pub apple: Option<Cell>,
    pub max_length: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Moved {
        snake: Snake,
        ate_apple: bool,
        /// False when the apple was eaten at the length cap.
        grew: bool,
    },
    Collided(CollisionReason),
}

/// Resolves one tick. `requested` is the buffered turn; reversals and
/// non-turns fall back to the current heading.
pub fn advance(snake: &Snake, requested: Option<Direction>, ctx: &MoveContext<'_>) -> Outcome {
    let heading = snake.effective_heading(requested);
    let stepped = snake.head().stepped(heading);

    let new_head = if ctx.board.contains(stepped) {
        stepped
    } else if ctx.arena.mode().wraps_at_boundary() {
        ctx.board.wrap(stepped)
    } else {
        return Outcome::Collided(CollisionReason::OutOfBounds);
    };

    // The head is about to move away and can never equal `new_head`, so a
    // hit on the index is a hit on segments 1..len.
    if snake.contains(new_head) {
        return Outcome::Collided(CollisionReason::SelfCollision);
    }

    if let Some(reason) = ctx.arena.collision_at(new_head) {
        return Outcome::Collided(reason);
    }

    let ate_apple = ctx.apple == Some(new_head);
    let grew = ate_apple && snake.len() < ctx.max_length;

    let mut next = snake.clone();
    next.advance_to(new_head, heading, grew);
    if next.len() > ctx.max_length {
        next.truncate(ctx.max_length);
    }

    Outcome::Moved {
        snake: next,
        ate_apple,
        grew,
    }
}
