use std::collections::{HashMap, VecDeque};

use super::board::Board;
use super::types::{Cell, Direction};

/// Ordered body (head first) with a multiset index for O(1) occupancy
/// checks. The index counts cells so that transient duplicates are tracked
/// correctly.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupancy: HashMap<Cell, u32>,
    heading: Direction,
    pending_heading: Option<Direction>,
}

impl PartialEq for Snake {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
            && self.heading == other.heading
            && self.pending_heading == other.pending_heading
    }
}

impl Snake {
    /// Lays `length` segments from `head` backwards against `heading`,
    /// wrapping on the board.
    pub fn new(head: Cell, heading: Direction, length: usize, board: &Board) -> Self {
        let back = heading.opposite();
        let mut cells = Vec::with_capacity(length.max(1));
        let mut cell = head;
        for _ in 0..length.max(1) {
            cells.push(cell);
            cell = board.wrap(cell.stepped(back));
        }
        Self::from_cells(cells, heading)
    }

    /// An empty `cells` yields a one-segment snake at the origin.
    pub fn from_cells(cells: Vec<Cell>, heading: Direction) -> Self {
        let mut body: VecDeque<Cell> = cells.into();
        if body.is_empty() {
            body.push_back(Cell::new(0, 0));
        }
        let mut snake = Self {
            body,
            occupancy: HashMap::new(),
            heading,
            pending_heading: None,
        };
        snake.rebuild_index();
        snake
    }

    fn rebuild_index(&mut self) {
        self.occupancy.clear();
        for cell in &self.body {
            *self.occupancy.entry(*cell).or_insert(0) += 1;
        }
    }

    fn index_add(&mut self, cell: Cell) {
        *self.occupancy.entry(cell).or_insert(0) += 1;
    }

    fn index_remove(&mut self, cell: Cell) {
        if let Some(count) = self.occupancy.get_mut(&cell) {
            *count -= 1;
            if *count == 0 {
                self.occupancy.remove(&cell);
            }
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.body.get(index).copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.occupancy.contains_key(&cell)
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn pending_heading(&self) -> Option<Direction> {
        self.pending_heading
    }

    /// Buffers a turn for the next tick. Only left/right turns relative to
    /// the current heading are accepted; a newer turn replaces an unapplied
    /// one. Rejected requests leave the buffer untouched.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if !self.heading.is_perpendicular(&direction) {
            return false;
        }
        self.pending_heading = Some(direction);
        true
    }

    /// Heading the next tick travels in, given an optional request.
    pub fn effective_heading(&self, requested: Option<Direction>) -> Direction {
        match requested {
            Some(direction) if self.heading.is_perpendicular(&direction) => direction,
            _ => self.heading,
        }
    }

    /// Pushes `head` to the front. Without `grow` the tail is dropped so the
    /// length stays constant.
    pub(crate) fn advance_to(&mut self, head: Cell, heading: Direction, grow: bool) {
        self.body.push_front(head);
        self.index_add(head);
        if !grow {
            if let Some(tail) = self.body.pop_back() {
                self.index_remove(tail);
            }
        }
        self.heading = heading;
        self.pending_heading = None;
    }

    /// Never shortens below one segment.
    pub fn truncate(&mut self, len: usize) {
        let len = len.max(1);
        while self.body.len() > len {
            if let Some(tail) = self.body.pop_back() {
                self.index_remove(tail);
            }
        }
    }

    pub fn set_cell(&mut self, index: usize, cell: Cell) {
        let Some(old) = self.body.get(index).copied() else {
            return;
        };
        self.body[index] = cell;
        self.index_remove(old);
        self.index_add(cell);
    }

    /// Cells held by more than one segment, sorted.
    pub fn duplicate_cells(&self) -> Vec<Cell> {
        let mut duplicates: Vec<Cell> = self
            .occupancy
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(cell, _)| *cell)
            .collect();
        duplicates.sort();
        duplicates
    }
}
