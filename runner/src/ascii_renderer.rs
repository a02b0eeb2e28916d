use common::games::snake::{BarrierKind, Cell, GameSnapshot, GameStatus};
use std::collections::HashMap;

/// Draws a snapshot as text, one character per cell.
pub fn render(snapshot: &GameSnapshot) -> String {
    let mut glyphs: HashMap<Cell, char> = HashMap::new();

    for (cell, kind) in &snapshot.barriers {
        let glyph = match kind {
            BarrierKind::Boundary => '#',
            BarrierKind::Complex => 'X',
            BarrierKind::RandomShape => '%',
        };
        glyphs.insert(*cell, glyph);
    }
    for (cell, _) in &snapshot.obstacles {
        glyphs.insert(*cell, 'O');
    }
    if let Some(apple) = snapshot.apple {
        glyphs.insert(apple, '@');
    }
    for (index, cell) in snapshot.snake.iter().enumerate() {
        glyphs.insert(*cell, if index == 0 { 'S' } else { 's' });
    }

    let n = snapshot.board_size;
    let mut out = String::with_capacity(((n + 3) * (n + 2)) as usize + 64);
    for z in -1..=n {
        for x in -1..=n {
            let cell = Cell::new(x, z);
            let inside = (0..n).contains(&x) && (0..n).contains(&z);
            let glyph = glyphs
                .get(&cell)
                .copied()
                .unwrap_or(if inside { '.' } else { '+' });
            out.push(glyph);
        }
        out.push('\n');
    }

    let status = match snapshot.status {
        GameStatus::Alive if snapshot.paused => "paused".to_string(),
        GameStatus::Alive => "alive".to_string(),
        GameStatus::Terminated(reason) => format!("terminated ({:?})", reason),
        GameStatus::Victory => "victory".to_string(),
    };
    out.push_str(&format!(
        "tick {} | length {} | apples {} | {}\n",
        snapshot.ticks,
        snapshot.snake.len(),
        snapshot.apples_eaten,
        status
    ));
    out
}
