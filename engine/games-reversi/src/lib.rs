//! Reversi (Othello) rules engine for the search engine
//!
//! The board is two 64-bit sets, one per colour, plus the side to move.
//! Legal-move tests walk the eight compass rays square by square; the
//! whole-board legal-move set is computed with shift-and-mask flooding, and
//! the two always agree.
//!
//! # Board Layout
//!
//! Square `(col, row)` is bit `col + 8 * row`:
//! ```text
//!        col 0  1  2  3  4  5  6  7
//! Row 0:   [ 0][ 1][ 2][ 3][ 4][ 5][ 6][ 7]
//! Row 1:   [ 8][ 9][10][11][12][13][14][15]
//!  ...
//! Row 7:   [56][57][58][59][60][61][62][63]
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_reversi::{BoardState, Move, Player};
//!
//! let mut board = BoardState::new();
//! assert_eq!(board.current_player(), Player::Black);
//! assert!(board.is_valid_move_at(3, 2, Player::Black));
//!
//! board.play(Move::at(3, 2));
//! assert_eq!(board.black_count(), 4);
//! assert_eq!(board.white_count(), 1);
//! ```

pub mod bitboard;

use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

use engine_core::GameState;
use rand::Rng;

use crate::bitboard::{on_board, square_mask, DIRECTIONS};

/// Side to move, or the result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
    /// Result value only; never a side to move
    Draw,
}

impl Player {
    /// The other side. `Draw` has no opponent and maps to itself.
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
            Player::Draw => Player::Draw,
        }
    }
}

/// A single ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Place a stone on `(col, row)`
    Place { col: u8, row: u8 },
    /// Hand the turn over without placing a stone
    Pass,
}

impl Move {
    /// Placing move at `(col, row)`.
    pub fn at(col: u8, row: u8) -> Self {
        Move::Place { col, row }
    }

    /// Placing move on the square with bit index `index` (0-63).
    pub fn from_index(index: u32) -> Self {
        let (col, row) = bitboard::coords(index);
        Move::Place {
            col: col as u8,
            row: row as u8,
        }
    }

    /// Column and row of a placing move.
    pub fn coords(&self) -> Option<(u8, u8)> {
        match *self {
            Move::Place { col, row } => Some((col, row)),
            Move::Pass => None,
        }
    }
}

/// Formats as `<col digit><row letter>`, e.g. `3C` for `(3, 2)`, or `pass`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Place { col, row } => write!(f, "{}{}", col, (b'A' + row) as char),
            Move::Pass => f.write_str("pass"),
        }
    }
}

/// Error parsing a move typed by a player.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected <column 0-9><row A-H>, e.g. 3C, got {0:?}")]
pub struct ParseMoveError(pub String);

/// Parses `<col digit><row letter>`. The column digit may be 8 or 9; such
/// moves parse but are rejected as off-board by [`BoardState::try_play`].
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[c @ b'0'..=b'9', r @ b'A'..=b'H'] => Ok(Move::at(c - b'0', r - b'A')),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// Error building a board from a layout string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("Layout must have exactly 64 squares, got {len}")]
    InvalidLayout { len: usize },

    #[error("Draw is a result, not a side to move")]
    InvalidMover,
}

/// Why a requested move was refused. The board is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Square {0} is off the board")]
    OutOfRange(Move),

    #[error("Square {0} is already occupied")]
    Occupied(Move),

    #[error("Move {0} captures nothing")]
    Illegal(Move),

    #[error("Cannot pass while a legal move exists")]
    PassNotAllowed,
}

/// Lazily computed terminality, reset whenever stones change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Unknown,
    Normal,
    Ended,
}

/// Reversi position: both colours' stones and the side to move.
///
/// Equality compares stones and side to move only.
#[derive(Debug, Clone)]
pub struct BoardState {
    black: u64,
    white: u64,
    player: Player,
    status: Cell<Status>,
}

impl BoardState {
    /// Standard opening, Black to move:
    /// ```text
    /// "        "
    /// "        "
    /// "        "
    /// "   ox   "
    /// "   xo   "
    /// "        "
    /// "        "
    /// "        "
    /// ```
    pub fn new() -> Self {
        Self {
            black: 0x0000_0008_1000_0000,
            white: 0x0000_0010_0800_0000,
            player: Player::Black,
            status: Cell::new(Status::Unknown),
        }
    }

    /// Build a board from 64 row-major squares: `'x'` is Black, `'o'` is
    /// White, anything else is empty.
    pub fn from_layout(layout: &str, player: Player) -> Result<Self, BoardError> {
        if player == Player::Draw {
            return Err(BoardError::InvalidMover);
        }

        let len = layout.chars().count();
        if len != bitboard::BOARD_SIZE {
            return Err(BoardError::InvalidLayout { len });
        }

        let (mut black, mut white) = (0u64, 0u64);
        for (i, square) in layout.chars().enumerate() {
            match square {
                'x' => black |= 1 << i,
                'o' => white |= 1 << i,
                _ => {}
            }
        }

        Ok(Self {
            black,
            white,
            player,
            status: Cell::new(Status::Unknown),
        })
    }

    /// The 64-character layout accepted by [`BoardState::from_layout`],
    /// with `' '` for empty squares.
    pub fn to_layout(&self) -> String {
        (0..bitboard::BOARD_SIZE)
            .map(|i| {
                let bit = 1u64 << i;
                if self.black & bit != 0 {
                    'x'
                } else if self.white & bit != 0 {
                    'o'
                } else {
                    ' '
                }
            })
            .collect()
    }

    /// The side to move.
    pub fn current_player(&self) -> Player {
        self.player
    }

    /// Black's stones as a bit set.
    pub fn black_bits(&self) -> u64 {
        self.black
    }

    /// White's stones as a bit set.
    pub fn white_bits(&self) -> u64 {
        self.white
    }

    /// Stones of `player`; empty for `Draw`.
    pub fn stones_of(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
            Player::Draw => 0,
        }
    }

    pub fn black_count(&self) -> u32 {
        self.black.count_ones()
    }

    pub fn white_count(&self) -> u32 {
        self.white.count_ones()
    }

    pub fn is_empty_at(&self, col: i32, row: i32) -> bool {
        on_board(col, row) && (self.black | self.white) & square_mask(col, row) == 0
    }

    pub fn is_black_at(&self, col: i32, row: i32) -> bool {
        on_board(col, row) && self.black & square_mask(col, row) != 0
    }

    pub fn is_white_at(&self, col: i32, row: i32) -> bool {
        on_board(col, row) && self.white & square_mask(col, row) != 0
    }

    /// Owner of a square, `None` if empty or off the board.
    pub fn stone_at(&self, col: i32, row: i32) -> Option<Player> {
        if self.is_black_at(col, row) {
            Some(Player::Black)
        } else if self.is_white_at(col, row) {
            Some(Player::White)
        } else {
            None
        }
    }

    /// Put a Black stone on an on-board square, replacing whatever is there.
    pub fn put_black_at(&mut self, col: i32, row: i32) {
        let bit = Self::checked_mask(col, row);
        self.black |= bit;
        self.white &= !bit;
        self.status.set(Status::Unknown);
    }

    /// Put a White stone on an on-board square, replacing whatever is there.
    pub fn put_white_at(&mut self, col: i32, row: i32) {
        let bit = Self::checked_mask(col, row);
        self.white |= bit;
        self.black &= !bit;
        self.status.set(Status::Unknown);
    }

    /// Swap the colour of the stone on a square. Empty squares stay empty.
    pub fn flip_at(&mut self, col: i32, row: i32) {
        let bit = Self::checked_mask(col, row);
        if (self.black | self.white) & bit != 0 {
            self.black ^= bit;
            self.white ^= bit;
            self.status.set(Status::Unknown);
        }
    }

    fn checked_mask(col: i32, row: i32) -> u64 {
        assert!(on_board(col, row), "square ({col}, {row}) is off the board");
        square_mask(col, row)
    }

    /// `(own, opponent)` stones from `player`'s point of view.
    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
            Player::Draw => (0, 0),
        }
    }

    /// Opponent stones `player` would flip along one ray from `(col, row)`,
    /// or 0 if the ray does not end in one of `player`'s stones.
    fn ray_captures(&self, col: i32, row: i32, (dx, dy): (i32, i32), player: Player) -> u64 {
        let (me, opp) = self.sides(player);
        let mut run = 0u64;
        let (mut c, mut r) = (col + dx, row + dy);

        while on_board(c, r) {
            let bit = square_mask(c, r);
            if opp & bit != 0 {
                run |= bit;
            } else if me & bit != 0 {
                return run;
            } else {
                return 0;
            }
            c += dx;
            r += dy;
        }

        0
    }

    /// Every stone `player` would flip by landing on `(col, row)`.
    fn captures(&self, col: i32, row: i32, player: Player) -> u64 {
        DIRECTIONS
            .iter()
            .fold(0, |acc, &dir| acc | self.ray_captures(col, row, dir, player))
    }

    /// True if `player` may place a stone on `(col, row)`: the square is on
    /// the board, empty, and at least one ray captures.
    pub fn is_valid_move_at(&self, col: i32, row: i32, player: Player) -> bool {
        if player == Player::Draw || !self.is_empty_at(col, row) {
            return false;
        }

        DIRECTIONS
            .iter()
            .any(|&dir| self.ray_captures(col, row, dir, player) != 0)
    }

    /// Every square `player` may play, as a bit set.
    pub fn legal_moves_mask(&self, player: Player) -> u64 {
        let (me, opp) = self.sides(player);
        if me == 0 {
            return 0;
        }
        bitboard::legal_moves_mask(me, opp)
    }

    /// Every legal placing move for `player`, in row-major order.
    pub fn enum_valid_moves(&self, player: Player) -> Vec<Move> {
        bitboard::squares(self.legal_moves_mask(player))
            .map(Move::from_index)
            .collect()
    }

    /// Apply a move for the side to move and hand the turn over.
    ///
    /// `Move::Pass` only switches the side to move. A placing move flips
    /// every captured run and puts the mover's stone down.
    ///
    /// # Panics
    ///
    /// If a placing move is off the board, lands on an occupied square, or
    /// captures nothing. Use [`BoardState::try_play`] for unchecked input.
    pub fn play(&mut self, mv: Move) {
        if let Move::Place { col, row } = mv {
            let (col, row) = (col as i32, row as i32);
            let bit = Self::checked_mask(col, row);
            assert!(
                (self.black | self.white) & bit == 0,
                "square {mv} is already occupied"
            );

            let flips = self.captures(col, row, self.player);
            assert!(flips != 0, "{mv} captures nothing for {:?}", self.player);

            match self.player {
                Player::Black => {
                    self.black |= flips | bit;
                    self.white &= !flips;
                }
                Player::White => {
                    self.white |= flips | bit;
                    self.black &= !flips;
                }
                Player::Draw => unreachable!("Draw is never the side to move"),
            }
            self.status.set(Status::Unknown);
        }

        self.player = self.player.opponent();
    }

    /// Apply a move given as raw coordinates; anything off the board means
    /// pass.
    pub fn move_at(&mut self, col: i32, row: i32) {
        if on_board(col, row) {
            self.play(Move::at(col as u8, row as u8));
        } else {
            self.play(Move::Pass);
        }
    }

    /// Validate and apply a requested move. On error nothing changes.
    pub fn try_play(&mut self, mv: Move) -> Result<(), MoveError> {
        match mv {
            Move::Pass => {
                if self.legal_moves_mask(self.player) != 0 {
                    return Err(MoveError::PassNotAllowed);
                }
            }
            Move::Place { col, row } => {
                let (col, row) = (col as i32, row as i32);
                if !on_board(col, row) {
                    return Err(MoveError::OutOfRange(mv));
                }
                if !self.is_empty_at(col, row) {
                    return Err(MoveError::Occupied(mv));
                }
                if !self.is_valid_move_at(col, row, self.player) {
                    return Err(MoveError::Illegal(mv));
                }
            }
        }

        self.play(mv);
        Ok(())
    }

    /// True when neither side has a legal move. Cached until stones change.
    pub fn is_end(&self) -> bool {
        if self.status.get() == Status::Unknown {
            let ended = self.legal_moves_mask(Player::Black) == 0
                && self.legal_moves_mask(Player::White) == 0;
            self.status
                .set(if ended { Status::Ended } else { Status::Normal });
        }

        self.status.get() == Status::Ended
    }

    /// True while at least one side can still move.
    pub fn is_normal(&self) -> bool {
        !self.is_end()
    }

    /// The side with more stones, or `Draw` on equal counts.
    ///
    /// Only meaningful once [`BoardState::is_end`] holds; on a running game
    /// it reports the current leader.
    pub fn winner(&self) -> Player {
        let (black, white) = (self.black_count(), self.white_count());
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Player::Black,
            std::cmp::Ordering::Less => Player::White,
            std::cmp::Ordering::Equal => Player::Draw,
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.black == other.black && self.white == other.white && self.player == other.player
    }
}

impl Eq for BoardState {}

impl GameState for BoardState {
    type Move = Move;
    type Player = Player;

    fn current_player(&self) -> Player {
        self.player
    }

    fn is_end(&self) -> bool {
        BoardState::is_end(self)
    }

    fn legal_moves(&self) -> Vec<Move> {
        self.enum_valid_moves(self.player)
    }

    fn pass_move(&self) -> Move {
        Move::Pass
    }

    fn play(&mut self, mv: Move) {
        BoardState::play(self, mv)
    }

    fn winner(&self) -> Player {
        BoardState::winner(self)
    }

    /// Random playout straight off the legal-move bit set.
    fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Player {
        let mut state = self.clone();

        while state.is_normal() {
            let mask = state.legal_moves_mask(state.player);
            if mask == 0 {
                state.play(Move::Pass);
            } else {
                let pick = rng.gen_range(0..mask.count_ones());
                state.play(Move::from_index(bitboard::nth_square(mask, pick)));
            }
        }

        state.winner()
    }
}
