//! 64-bit board sets and the mask arithmetic behind move generation.
//!
//! Square `(col, row)` maps to bit `col + 8 * row`, so ascending bit order
//! is row-major scan order.

/// Board width and height
pub const WIDTH: i32 = 8;

/// Number of squares
pub const BOARD_SIZE: usize = 64;

// Masks to prevent wrapping when shifting east/west
const NOT_A_FILE: u64 = 0xfefe_fefe_fefe_fefe;
const NOT_H_FILE: u64 = 0x7f7f_7f7f_7f7f_7f7f;

/// The eight compass directions as `(dx, dy)`, row-major around the square.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// True if `(col, row)` lies on the board.
#[inline]
pub fn on_board(col: i32, row: i32) -> bool {
    (0..WIDTH).contains(&col) && (0..WIDTH).contains(&row)
}

/// Bit index of an on-board square.
#[inline]
pub fn index(col: i32, row: i32) -> u32 {
    debug_assert!(on_board(col, row));
    (col + WIDTH * row) as u32
}

/// Single-bit mask for an on-board square.
#[inline]
pub fn square_mask(col: i32, row: i32) -> u64 {
    1u64 << index(col, row)
}

/// `(col, row)` of a bit index.
#[inline]
pub fn coords(index: u32) -> (i32, i32) {
    (index as i32 % WIDTH, index as i32 / WIDTH)
}

/// Move every square of `bits` one step in direction `(dx, dy)`, dropping
/// squares that would leave the board.
#[inline]
pub fn shift(bits: u64, (dx, dy): (i32, i32)) -> u64 {
    let delta = dx + WIDTH * dy;
    let moved = if delta >= 0 {
        bits << delta
    } else {
        bits >> -delta
    };

    match dx {
        1 => moved & NOT_A_FILE,
        -1 => moved & NOT_H_FILE,
        _ => moved,
    }
}

/// Squares where the side owning `me` can play against `opp`.
///
/// For each direction, flood out from `me` through contiguous `opp` stones;
/// an empty square one step past such a run is a legal landing square.
pub fn legal_moves_mask(me: u64, opp: u64) -> u64 {
    let empty = !(me | opp);
    let mut moves = 0u64;

    for dir in DIRECTIONS {
        let mut candidates = shift(me, dir) & opp;
        let mut run = candidates;

        while candidates != 0 {
            candidates = shift(candidates, dir) & opp;
            run |= candidates;
        }

        moves |= shift(run, dir) & empty;
    }

    moves
}

/// Iterate the set bits of `mask` in ascending order.
pub fn squares(mut mask: u64) -> impl Iterator<Item = u32> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let i = mask.trailing_zeros();
        mask &= mask - 1;
        Some(i)
    })
}

/// Index of the `n`-th (0-based) set bit of `mask`.
///
/// Panics if `mask` has `n` or fewer bits set.
pub fn nth_square(mask: u64, n: u32) -> u32 {
    match squares(mask).nth(n as usize) {
        Some(i) => i,
        None => panic!("mask {mask:#018x} has no set bit #{n}"),
    }
}
