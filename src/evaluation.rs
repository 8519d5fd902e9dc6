use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Pos, Rank, Side, BOARD_SIZE};

/// Heuristic scorer. Positive scores favour the machine.
pub struct Evaluator {
    // Material
    pub man_value: f64,
    pub king_value: f64,

    // Positional terms
    pub advance_weight: f64,
    pub back_row_penalty: f64,

    /// Bonus added at a finished game, signed by the winner.
    pub win_bonus: f64,

    /// Half-width of the uniform tie-break noise; zero disables it.
    pub jitter: f64,
    rng: StdRng,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible jitter sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// No jitter at all; every evaluation of a board returns the same score.
    pub fn deterministic() -> Self {
        let mut evaluator = Self::seeded(0);
        evaluator.jitter = 0.0;
        evaluator
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            man_value: 1.0,
            king_value: 1.8,
            advance_weight: 0.05,
            back_row_penalty: 0.1,
            win_bonus: 1000.0,
            jitter: 0.005,
            rng,
        }
    }

    pub fn evaluate(&mut self, board: &Board) -> f64 {
        let score = self.evaluate_static(board);
        if self.jitter > 0.0 {
            score + self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            score
        }
    }

    /// Material plus position, without the random tie-break.
    pub fn evaluate_static(&self, board: &Board) -> f64 {
        let mut score = 0.0;
        for pos in Pos::all() {
            if let Some(piece) = board.get(pos) {
                let sign = match piece.owner {
                    Side::Machine => 1.0,
                    Side::Player => -1.0,
                };
                let value = match piece.rank {
                    Rank::Man => self.man_value,
                    Rank::King => self.king_value,
                };
                score += sign * (value + self.position_bonus(piece.owner, piece.rank, pos));
            }
        }
        score
    }

    // Both terms are multiplied by the owner's sign afterwards.
    fn position_bonus(&self, owner: Side, rank: Rank, pos: Pos) -> f64 {
        let row = pos.row as f64;
        match owner {
            Side::Machine => {
                let mut bonus = (BOARD_SIZE - 1 - pos.row) as f64 * self.advance_weight;
                if pos.row == BOARD_SIZE - 1 && rank == Rank::Man {
                    bonus -= self.back_row_penalty;
                }
                bonus
            }
            Side::Player => {
                let mut bonus = -row * self.advance_weight;
                if pos.row == 0 && rank == Rank::Man {
                    bonus += self.back_row_penalty;
                }
                bonus
            }
        }
    }

    /// Leaf score of a finished game.
    pub fn evaluate_terminal(&mut self, board: &Board, winner: Option<Side>) -> f64 {
        let score = self.evaluate(board);
        match winner {
            Some(Side::Machine) => score + self.win_bonus,
            Some(Side::Player) => score - self.win_bonus,
            None => score,
        }
    }
}
