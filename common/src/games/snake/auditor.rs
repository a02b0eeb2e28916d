use crate::{log, warn};
use super::arena::Arena;
use super::board::Board;
use super::snake::Snake;
use super::types::{Anchor, Cell};

#[derive(Clone, Debug, PartialEq)]
pub enum Correction {
    LengthCapped { from: usize, to: usize },
    VisualDesync { cells: usize, visuals: usize },
    HeadReset { from: Cell, to: Cell },
    SegmentRepaired { index: usize, from: Cell, to: Cell },
    ObstacleClamped { from: Cell, to: Cell },
    BarrierClamped { from: Cell, to: Cell },
    AppleClamped { from: Cell, to: Cell },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuditReport {
    pub corrections: Vec<Correction>,
    /// Reported only. A repeated cell is the normal state while a growth
    /// step settles, so it is never removed here.
    pub duplicate_cells: Vec<Cell>,
}

impl AuditReport {
    pub fn corrected(&self) -> bool {
        !self.corrections.is_empty()
    }
}

/// Mutable view of everything the auditor may repair.
pub struct AuditTarget<'a> {
    pub board: &'a Board,
    pub snake: &'a mut Snake,
    /// Render-side anchors, parallel to the snake's cells.
    pub segment_anchors: &'a mut Vec<Anchor>,
    pub arena: &'a mut Arena,
    pub apple: &'a mut Option<Cell>,
    pub max_length: usize,
}

/// Detects and repairs state corruption. Each check runs independently;
/// nothing here can end the round.
pub fn audit(target: AuditTarget<'_>) -> AuditReport {
    let AuditTarget {
        board,
        snake,
        segment_anchors,
        arena,
        apple,
        max_length,
    } = target;
    let mut report = AuditReport::default();

    if snake.len() > max_length {
        report.corrections.push(Correction::LengthCapped {
            from: snake.len(),
            to: max_length,
        });
        snake.truncate(max_length);
    }

    if segment_anchors.len() != snake.len() {
        report.corrections.push(Correction::VisualDesync {
            cells: snake.len(),
            visuals: segment_anchors.len(),
        });
        if segment_anchors.is_empty() {
            segment_anchors.extend(snake.cells().map(|c| board.anchor(c)));
        } else {
            let len = snake.len().min(segment_anchors.len());
            snake.truncate(len);
            segment_anchors.truncate(len);
        }
    }

    for index in 0..snake.len() {
        let Some(cell) = snake.cell(index) else {
            break;
        };
        if board.contains(cell) {
            continue;
        }
        let replacement = if index == 0 {
            let center = board.center();
            report.corrections.push(Correction::HeadReset { from: cell, to: center });
            center
        } else {
            let previous = snake.cell(index - 1).unwrap_or_else(|| board.center());
            report.corrections.push(Correction::SegmentRepaired {
                index,
                from: cell,
                to: previous,
            });
            previous
        };
        snake.set_cell(index, replacement);
        if let Some(anchor) = segment_anchors.get_mut(index) {
            *anchor = board.anchor(replacement);
        }
    }

    for (from, to) in arena.obstacles.clamp_into(board) {
        report.corrections.push(Correction::ObstacleClamped { from, to });
    }
    for (from, to) in arena.barriers.clamp_into(board) {
        report.corrections.push(Correction::BarrierClamped { from, to });
    }

    if let Some(cell) = apple.as_mut()
        && !board.contains(*cell)
    {
        let clamped = board.clamp_to_board(*cell);
        report.corrections.push(Correction::AppleClamped {
            from: *cell,
            to: clamped,
        });
        *cell = clamped;
    }

    report.duplicate_cells = snake.duplicate_cells();

    for correction in &report.corrections {
        warn!("Integrity audit corrected {:?}", correction);
    }
    if !report.duplicate_cells.is_empty() {
        log!(
            "Integrity audit found duplicate snake cells {:?}",
            report.duplicate_cells
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::barriers::{Barrier, BarrierField};
    use crate::games::snake::obstacles::ObstacleField;
    use crate::games::snake::types::{Direction, GameMode};

    struct Fixture {
        board: Board,
        snake: Snake,
        anchors: Vec<Anchor>,
        arena: Arena,
        apple: Option<Cell>,
    }

    impl Fixture {
        fn new(cells: Vec<Cell>) -> Self {
            let board = Board::new(20);
            let snake = Snake::from_cells(cells, Direction::Right);
            let anchors = snake.cells().map(|c| board.anchor(c)).collect();
            Self {
                board,
                snake,
                anchors,
                arena: Arena::open(GameMode::Classic),
                apple: Some(Cell::new(3, 3)),
            }
        }

        fn run(&mut self, max_length: usize) -> AuditReport {
            audit(AuditTarget {
                board: &self.board,
                snake: &mut self.snake,
                segment_anchors: &mut self.anchors,
                arena: &mut self.arena,
                apple: &mut self.apple,
                max_length,
            })
        }
    }

    fn row(len: i32) -> Vec<Cell> {
        (0..len).rev().map(|x| Cell::new(x, 5)).collect()
    }

    #[test]
    fn test_clean_state_reports_nothing() {
        let mut fixture = Fixture::new(row(5));
        let report = fixture.run(100);
        assert!(!report.corrected());
        assert!(report.duplicate_cells.is_empty());
    }

    #[test]
    fn test_head_out_of_range_resets_to_center() {
        let mut fixture = Fixture::new(vec![Cell::new(25, 5), Cell::new(4, 5), Cell::new(3, 5)]);
        let report = fixture.run(100);

        assert!(report.corrected());
        assert_eq!(fixture.snake.head(), Cell::new(9, 9));
        assert_eq!(fixture.anchors[0], fixture.board.anchor(Cell::new(9, 9)));
        assert_eq!(
            report.corrections,
            vec![Correction::HeadReset {
                from: Cell::new(25, 5),
                to: Cell::new(9, 9),
            }]
        );
    }

    #[test]
    fn test_body_out_of_range_copies_previous_cell() {
        let mut fixture = Fixture::new(vec![
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(-3, 5),
            Cell::new(-4, 5),
        ]);
        let report = fixture.run(100);

        assert_eq!(fixture.snake.cell(2), Some(Cell::new(4, 5)));
        assert_eq!(fixture.snake.cell(3), Some(Cell::new(4, 5)));
        assert_eq!(report.corrections.len(), 2);
        assert_eq!(report.duplicate_cells, vec![Cell::new(4, 5)]);
    }

    #[test]
    fn test_length_over_cap_is_truncated() {
        let mut fixture = Fixture::new(row(12));
        let report = fixture.run(10);

        assert_eq!(fixture.snake.len(), 10);
        assert_eq!(fixture.anchors.len(), 10);
        assert_eq!(
            report.corrections[0],
            Correction::LengthCapped { from: 12, to: 10 }
        );
    }

    #[test]
    fn test_visual_desync_truncates_longer_side() {
        let mut fixture = Fixture::new(row(6));
        fixture.anchors.truncate(4);
        let report = fixture.run(100);
        assert_eq!(fixture.snake.len(), 4);
        assert_eq!(fixture.anchors.len(), 4);
        assert!(report.corrected());

        let mut fixture = Fixture::new(row(3));
        fixture.anchors.push(Anchor { x: 0.0, z: 0.0 });
        fixture.run(100);
        assert_eq!(fixture.snake.len(), 3);
        assert_eq!(fixture.anchors.len(), 3);
    }

    #[test]
    fn test_missing_visuals_are_rebuilt() {
        let mut fixture = Fixture::new(row(3));
        fixture.anchors.clear();
        fixture.run(100);
        assert_eq!(fixture.snake.len(), 3);
        assert_eq!(fixture.anchors.len(), 3);
    }

    #[test]
    fn test_registries_and_apple_are_clamped() {
        let mut fixture = Fixture::new(row(3));
        let mut obstacles = ObstacleField::empty();
        obstacles.insert_unchecked(&fixture.board, Cell::new(30, 2));
        let mut barriers = BarrierField::empty();
        barriers.add_boundary(&fixture.board);
        barriers.push(Barrier::Complex(Cell::new(-5, 7)));
        fixture.arena = Arena::new(GameMode::Barriers, obstacles, barriers);
        fixture.apple = Some(Cell::new(12, 40));

        let report = fixture.run(100);

        assert!(fixture.arena.obstacles.contains(Cell::new(19, 2)));
        assert!(fixture.arena.barriers.contains(Cell::new(0, 7)));
        assert!(fixture.arena.barriers.contains(Cell::new(-1, 7)));
        assert_eq!(fixture.apple, Some(Cell::new(12, 19)));
        assert_eq!(report.corrections.len(), 3);
    }

    #[test]
    fn test_duplicates_are_reported_not_removed() {
        let mut fixture = Fixture::new(vec![
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(3, 5),
            Cell::new(3, 5),
        ]);
        let report = fixture.run(100);

        assert!(!report.corrected());
        assert_eq!(report.duplicate_cells, vec![Cell::new(3, 5)]);
        assert_eq!(fixture.snake.len(), 4);
    }
}
