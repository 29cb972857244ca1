//! Text rendering of a board.

use games_reversi::{BoardState, Player};

const HEADER: &str = "   0 1 2 3 4 5 6 7 ";
const TOP: &str = "  ┌─┬─┬─┬─┬─┬─┬─┬─┐";
const MIDDLE: &str = "  ├─┼─┼─┼─┼─┼─┼─┼─┤";
const BOTTOM: &str = "  └─┴─┴─┴─┴─┴─┴─┴─┘";

/// Stone glyph used on the board and in result lines.
pub fn glyph(player: Player) -> char {
    match player {
        Player::Black => '●',
        Player::White => '○',
        Player::Draw => ' ',
    }
}

/// Box-drawn board with column digits on top, row letters down the side,
/// and both stone counts underneath. Ends with a newline.
pub fn render(state: &BoardState) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(TOP);
    out.push('\n');

    for row in 0..8 {
        out.push((b'A' + row as u8) as char);
        out.push_str(" │");
        for col in 0..8 {
            out.push(state.stone_at(col, row).map_or(' ', glyph));
            out.push('│');
        }
        out.push('\n');
        out.push_str(if row < 7 { MIDDLE } else { BOTTOM });
        out.push('\n');
    }

    out.push_str(&format!(
        "  ●: {}  ○: {}\n",
        state.black_count(),
        state.white_count()
    ));
    out
}
