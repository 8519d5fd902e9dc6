use std::fmt;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::{Board, Pos, Side};
use crate::error::EngineError;
use crate::evaluation::Evaluator;
use crate::movegen::{Move, MoveGenerator};
use crate::search::Search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// How the machine picks a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Random,
    Search { depth: u32 },
}

impl Difficulty {
    /// Unknown labels fall back to medium.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            other => {
                warn!("unknown difficulty {:?}, using medium", other);
                Difficulty::Medium
            }
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            Difficulty::Easy => Policy::Random,
            Difficulty::Medium => Policy::Search { depth: 3 },
            Difficulty::Hard => Policy::Search { depth: 5 },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Chooses machine moves for a difficulty level.
pub struct MachinePlayer {
    search: Search,
    move_generator: MoveGenerator,
    rng: StdRng,
}

impl Default for MachinePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MachinePlayer {
    pub fn new() -> Self {
        Self::with_parts(Evaluator::new(), StdRng::from_entropy())
    }

    /// Both the evaluator jitter and the random policy derive from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(
            Evaluator::seeded(seed),
            StdRng::seed_from_u64(seed.wrapping_add(0x9e37_79b9_7f4a_7c15)),
        )
    }

    pub fn with_parts(evaluator: Evaluator, rng: StdRng) -> Self {
        Self {
            search: Search::new(evaluator),
            move_generator: MoveGenerator::new(),
            rng,
        }
    }

    pub fn search_mut(&mut self) -> &mut Search {
        &mut self.search
    }

    /// Opening hop of a machine turn, or `None` when the machine cannot move.
    pub fn choose_move(
        &mut self,
        board: &Board,
        difficulty: Difficulty,
    ) -> Result<Option<Move>, EngineError> {
        let legal = self.move_generator.generate_moves(board, Side::Machine);
        if legal.is_empty() {
            return Ok(None);
        }

        match difficulty.policy() {
            Policy::Random => Ok(self.pick_random(&legal)),
            Policy::Search { depth } => {
                self.search.set_max_depth(depth);
                let result = self.search.find_best_move(board)?;
                match result.best_move {
                    Some(mv) => Ok(Some(mv)),
                    None => {
                        warn!("search at depth {} returned no move, playing a random one", depth);
                        Ok(self.pick_random(&legal))
                    }
                }
            }
        }
    }

    /// Next hop of a capture chain; only captures by the piece on `from` qualify.
    pub fn choose_continuation(
        &mut self,
        board: &Board,
        from: Pos,
        difficulty: Difficulty,
    ) -> Result<Option<Move>, EngineError> {
        let captures = self.move_generator.capture_moves(board, from);
        if captures.is_empty() {
            return Ok(None);
        }

        match difficulty.policy() {
            Policy::Random => Ok(self.pick_random(&captures)),
            Policy::Search { depth } => {
                self.search.set_max_depth(depth);
                let result = self.search.best_among(board, &captures)?;
                debug!(
                    "chain continuation from {}: {:?} score {:.3}",
                    from,
                    result.best_move.map(|mv| mv.to_string()),
                    result.score
                );
                match result.best_move {
                    Some(mv) => Ok(Some(mv)),
                    None => {
                        warn!("search found no continuation from {}, playing a random one", from);
                        Ok(self.pick_random(&captures))
                    }
                }
            }
        }
    }

    fn pick_random(&mut self, moves: &[Move]) -> Option<Move> {
        moves.choose(&mut self.rng).copied()
    }
}
