use std::fmt;

use crate::board::{Board, Pos, Side};

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// One hop: a relocation that optionally removes exactly one opposing piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
    pub captured: Option<Pos>,
}

impl Move {
    pub fn new(from: Pos, to: Pos) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    pub fn new_capture(from: Pos, to: Pos, captured: Pos) -> Self {
        Self {
            from,
            to,
            captured: Some(captured),
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Won(Side),
    Draw,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        *self != GameState::Ongoing
    }
}

pub struct MoveGenerator;

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Non-capturing moves of the piece on `pos`. Men step forward one cell,
    /// kings slide along all four diagonals until blocked.
    pub fn normal_moves(&self, board: &Board, pos: Pos) -> Vec<Move> {
        let mut moves = Vec::new();
        let piece = match board.get(pos) {
            Some(piece) => piece,
            None => return moves,
        };

        if piece.is_king() {
            for &(dr, dc) in &DIAGONALS {
                let mut current = pos.offset(dr, dc);
                while let Some(to) = current {
                    if !board.is_empty(to) {
                        break;
                    }
                    moves.push(Move::new(pos, to));
                    current = to.offset(dr, dc);
                }
            }
        } else {
            let dr = piece.owner.forward();
            for dc in [-1, 1] {
                if let Some(to) = pos.offset(dr, dc) {
                    if board.is_empty(to) {
                        moves.push(Move::new(pos, to));
                    }
                }
            }
        }
        moves
    }

    /// Capturing moves of the piece on `pos`, in all four directions for both ranks.
    pub fn capture_moves(&self, board: &Board, pos: Pos) -> Vec<Move> {
        let mut moves = Vec::new();
        let piece = match board.get(pos) {
            Some(piece) => piece,
            None => return moves,
        };

        for &(dr, dc) in &DIAGONALS {
            if piece.is_king() {
                // First occupied cell must be an opponent; land on any empty
                // cell after it up to the next obstruction.
                let mut jumped = None;
                let mut current = pos.offset(dr, dc);
                while let Some(cell) = current {
                    match (board.get(cell), jumped) {
                        (Some(other), None) if other.owner != piece.owner => jumped = Some(cell),
                        (Some(_), _) => break,
                        (None, Some(victim)) => moves.push(Move::new_capture(pos, cell, victim)),
                        (None, None) => {}
                    }
                    current = cell.offset(dr, dc);
                }
            } else {
                let (victim, landing) = match (pos.offset(dr, dc), pos.offset(2 * dr, 2 * dc)) {
                    (Some(victim), Some(landing)) => (victim, landing),
                    _ => continue,
                };
                let is_opponent = board
                    .get(victim)
                    .map_or(false, |other| other.owner != piece.owner);
                if is_opponent && board.is_empty(landing) {
                    moves.push(Move::new_capture(pos, landing, victim));
                }
            }
        }
        moves
    }

    /// Every capture available to `side`. Non-empty means capturing is compulsory.
    pub fn mandatory_captures(&self, board: &Board, side: Side) -> Vec<Move> {
        board
            .pieces(side)
            .flat_map(|(pos, _)| self.capture_moves(board, pos))
            .collect()
    }

    /// Moves the piece on `pos` may make this turn under the forced-capture rule.
    pub fn legal_moves(&self, board: &Board, pos: Pos) -> Vec<Move> {
        let owner = match board.get(pos) {
            Some(piece) => piece.owner,
            None => return Vec::new(),
        };
        if self.mandatory_captures(board, owner).is_empty() {
            self.normal_moves(board, pos)
        } else {
            self.capture_moves(board, pos)
        }
    }

    /// All moves `side` may make this turn: its captures if it has any,
    /// otherwise every normal move, in row-major piece order.
    pub fn generate_moves(&self, board: &Board, side: Side) -> Vec<Move> {
        let captures = self.mandatory_captures(board, side);
        if !captures.is_empty() {
            return captures;
        }
        board
            .pieces(side)
            .flat_map(|(pos, _)| self.normal_moves(board, pos))
            .collect()
    }

    pub fn has_legal_move(&self, board: &Board, side: Side) -> bool {
        if !self.mandatory_captures(board, side).is_empty() {
            return true;
        }
        board
            .pieces(side)
            .any(|(pos, _)| !self.normal_moves(board, pos).is_empty())
    }

    fn has_lost(&self, board: &Board, side: Side) -> bool {
        board.count(side) == 0 || !self.has_legal_move(board, side)
    }

    pub fn is_terminal(&self, board: &Board) -> bool {
        self.has_lost(board, Side::Player) || self.has_lost(board, Side::Machine)
    }

    /// Winner of a terminal board, `None` when nobody has won.
    ///
    /// Running out of pieces always loses. Otherwise the side without a legal
    /// move loses, unless both are stuck.
    pub fn winner(&self, board: &Board) -> Option<Side> {
        if board.count(Side::Player) == 0 {
            return Some(Side::Machine);
        }
        if board.count(Side::Machine) == 0 {
            return Some(Side::Player);
        }
        match (
            self.has_legal_move(board, Side::Player),
            self.has_legal_move(board, Side::Machine),
        ) {
            (false, true) => Some(Side::Machine),
            (true, false) => Some(Side::Player),
            _ => None,
        }
    }

    pub fn get_game_state(&self, board: &Board) -> GameState {
        if !self.is_terminal(board) {
            return GameState::Ongoing;
        }
        match self.winner(board) {
            Some(side) => GameState::Won(side),
            None => GameState::Draw,
        }
    }

    /// End-of-game check for the live board, where only the side to move must
    /// have a legal move.
    pub fn get_turn_state(&self, board: &Board, to_move: Side) -> GameState {
        if board.count(Side::Machine) == 0 {
            return GameState::Won(Side::Player);
        }
        if board.count(Side::Player) == 0 {
            return GameState::Won(Side::Machine);
        }
        if self.has_legal_move(board, to_move) {
            return GameState::Ongoing;
        }
        if self.has_legal_move(board, to_move.opposite()) {
            GameState::Won(to_move.opposite())
        } else {
            GameState::Draw
        }
    }
}
