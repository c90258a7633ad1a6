//! ASCII board rendering for the terminal front end

use dotbox_core::{Dot, GameState, Player};

fn edge_claimed(state: &GameState, a: Dot, b: Dot) -> bool {
    state
        .board()
        .edge_between(a, b)
        .and_then(|id| state.edge_owner(id))
        .is_some()
}

/// Render the board with dot coordinates along both axes so the player can
/// name an edge by its two endpoints.
pub fn render(state: &GameState) -> String {
    let size = state.board().size();
    let mut out = String::new();

    out.push_str("    ");
    for x in 0..=size {
        out.push_str(&format!("{:<4}", x));
    }
    out.push('\n');

    for y in 0..=size {
        // Dot row with horizontal edges
        out.push_str(&format!("{:>3} ", y));
        for x in 0..=size {
            out.push('+');
            if x < size {
                if edge_claimed(state, Dot::new(x, y), Dot::new(x + 1, y)) {
                    out.push_str("---");
                } else {
                    out.push_str("   ");
                }
            }
        }
        out.push('\n');

        // Cell row with vertical edges and ownership fills
        if y < size {
            out.push_str("    ");
            for x in 0..=size {
                if edge_claimed(state, Dot::new(x, y), Dot::new(x, y + 1)) {
                    out.push('|');
                } else {
                    out.push(' ');
                }
                if x < size {
                    let cell = state.board().cell_id(y, x);
                    out.push_str(match state.cell_owner(cell) {
                        Some(Player::Human) => " P ",
                        Some(Player::Computer) => " C ",
                        None => "   ",
                    });
                }
            }
            out.push('\n');
        }
    }

    out
}
