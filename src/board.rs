use std::fmt;
use std::str::FromStr;

use log::info;

use crate::error::EngineError;
use crate::movegen::Move;

pub const BOARD_SIZE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Machine,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Player => Side::Machine,
            Side::Machine => Side::Player,
        }
    }

    /// Row delta of a man's non-capturing step.
    pub fn forward(&self) -> i8 {
        match self {
            Side::Player => 1,
            Side::Machine => -1,
        }
    }

    /// The opponent's home row, where this side's men are crowned.
    pub fn promotion_row(&self) -> u8 {
        match self {
            Side::Player => BOARD_SIZE - 1,
            Side::Machine => 0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Machine => write!(f, "machine"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub owner: Side,
    pub rank: Rank,
}

impl Piece {
    pub fn man(owner: Side) -> Self {
        Self { owner, rank: Rank::Man }
    }

    pub fn king(owner: Side) -> Self {
        Self { owner, rank: Rank::King }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    fn to_char(self) -> char {
        match (self.owner, self.rank) {
            (Side::Player, Rank::Man) => 'p',
            (Side::Player, Rank::King) => 'P',
            (Side::Machine, Rank::Man) => 'm',
            (Side::Machine, Rank::King) => 'M',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'p' => Some(Piece::man(Side::Player)),
            'P' => Some(Piece::king(Side::Player)),
            'm' => Some(Piece::man(Side::Machine)),
            'M' => Some(Piece::king(Side::Machine)),
            _ => None,
        }
    }
}

/// A cell is either empty or holds exactly one piece.
pub type Cell = Option<Piece>;

/// Board coordinate. Row 0 is the player's home edge, row 7 the machine's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Step by `(dr, dc)`, or `None` when that leaves the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Pos> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Pos::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn all() -> impl Iterator<Item = Pos> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Pos::new(row, col)))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

impl FromStr for Pos {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(EngineError::InvalidSquare(s.to_string()));
        }
        let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let row = bytes[1].wrapping_sub(b'1');
        if col >= BOARD_SIZE || row >= BOARD_SIZE {
            return Err(EngineError::InvalidSquare(s.to_string()));
        }
        Ok(Pos::new(row, col))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard setup: three rows of men per side on the dark cells.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..3 {
            for col in ((row + 1) % 2..BOARD_SIZE).step_by(2) {
                board.place(Pos::new(row, col), Piece::man(Side::Player));
            }
        }
        for row in BOARD_SIZE - 3..BOARD_SIZE {
            for col in ((row + 1) % 2..BOARD_SIZE).step_by(2) {
                board.place(Pos::new(row, col), Piece::man(Side::Machine));
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Parses eight `/`-separated rows, top row (row 7) first.
    pub fn from_diagram(diagram: &str) -> Result<Self, EngineError> {
        let rows: Vec<&str> = diagram.trim().split('/').map(str::trim).collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(EngineError::InvalidDiagram(format!(
                "expected {} rows, found {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        let mut board = Self::empty();
        for (i, text) in rows.iter().enumerate() {
            let row = BOARD_SIZE - 1 - i as u8;
            if text.chars().count() != BOARD_SIZE as usize {
                return Err(EngineError::InvalidDiagram(format!(
                    "row {} has {} cells",
                    row + 1,
                    text.chars().count()
                )));
            }
            for (col, c) in text.chars().enumerate() {
                if c == '.' {
                    continue;
                }
                let piece = Piece::from_char(c).ok_or_else(|| {
                    EngineError::InvalidDiagram(format!("unknown piece {:?}", c))
                })?;
                board.place(Pos::new(row, col as u8), piece);
            }
        }
        Ok(board)
    }

    pub fn to_diagram(&self) -> String {
        (0..BOARD_SIZE)
            .rev()
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| self.get(Pos::new(row, col)).map_or('.', Piece::to_char))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[pos.row as usize][pos.col as usize]
    }

    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_none()
    }

    pub fn place(&mut self, pos: Pos, piece: Piece) {
        self.cells[pos.row as usize][pos.col as usize] = Some(piece);
    }

    pub fn clear(&mut self, pos: Pos) -> Cell {
        self.cells[pos.row as usize][pos.col as usize].take()
    }

    /// Pieces of `side` in row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Pos, Piece)> + '_ {
        Pos::all().filter_map(move |pos| match self.get(pos) {
            Some(piece) if piece.owner == side => Some((pos, piece)),
            _ => None,
        })
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces(side).count()
    }

    /// Applies one move: relocate, remove the captured piece, crown on the far row.
    ///
    /// Returns whether the moved piece was promoted. Both invariants are checked
    /// before anything is touched, so an `Err` leaves the board unchanged.
    pub fn make_move(&mut self, mv: Move) -> Result<bool, EngineError> {
        let mut piece = self.get(mv.from).ok_or(EngineError::EmptySource(mv.from))?;
        if let Some(captured) = mv.captured {
            if self.is_empty(captured) {
                return Err(EngineError::MissingCapture(captured));
            }
        }

        self.clear(mv.from);
        let promoted = !piece.is_king() && mv.to.row == piece.owner.promotion_row();
        if promoted {
            piece.rank = Rank::King;
        }
        self.place(mv.to, piece);

        if let Some(captured) = mv.captured {
            self.clear(captured);
        }
        Ok(promoted)
    }

    /// Same as [`Board::make_move`] but narrates the change; used for the live board.
    pub fn make_move_logged(&mut self, mv: Move) -> Result<bool, EngineError> {
        let mover = self.get(mv.from).map(|p| p.owner);
        let promoted = self.make_move(mv)?;
        if let Some(captured) = mv.captured {
            info!("piece captured on {}", captured);
        }
        if promoted {
            if let Some(owner) = mover {
                info!("{} piece crowned on {}", owner, mv.to);
            }
        }
        Ok(promoted)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in (0..BOARD_SIZE).rev() {
            result.push_str(&format!("{} ", row + 1));
            for col in 0..BOARD_SIZE {
                let pos = Pos::new(row, col);
                result.push(self.get(pos).map_or('.', Piece::to_char));
                if col < BOARD_SIZE - 1 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h\n");
        write!(f, "{}", result)
    }
}
