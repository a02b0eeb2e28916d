use serde::{Deserialize, Serialize};

/// Grid coordinate. Signed so that boundary barriers (`-1`, `N`) and
/// corrupted positions can be represented and repaired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    pub fn stepped(&self, direction: Direction) -> Self {
        let (dx, dz) = direction.delta();
        self.offset(dx, dz)
    }
}

/// Visualization anchor (cell center in scene units).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector on the `(x, z)` plane.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn from_delta(dx: i32, dz: i32) -> Option<Direction> {
        match (dx, dz) {
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }

    pub fn is_perpendicular(&self, other: &Direction) -> bool {
        let (ax, az) = self.delta();
        let (bx, bz) = other.delta();
        ax * bx + az * bz == 0
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    Classic,
    Barriers,
    Campaign,
    Obstacles,
    RandomBarriers,
}

impl GameMode {
    pub fn wraps_at_boundary(&self) -> bool {
        matches!(self, GameMode::Classic)
    }

    pub fn uses_fixed_barriers(&self) -> bool {
        matches!(self, GameMode::Barriers | GameMode::Campaign)
    }

    pub fn uses_obstacles(&self) -> bool {
        matches!(self, GameMode::Obstacles)
    }

    pub fn uses_random_barriers(&self) -> bool {
        matches!(self, GameMode::RandomBarriers)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionReason {
    SelfCollision,
    Obstacle,
    Barrier,
    OutOfBounds,
}
