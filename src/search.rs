use std::time::Instant;

use log::debug;

use crate::board::{Board, Side};
use crate::error::EngineError;
use crate::evaluation::Evaluator;
use crate::movegen::{Move, MoveGenerator};
use crate::rollout::rollout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub score: f64,
    pub best_move: Option<Move>,
}

impl SearchResult {
    fn leaf(score: f64) -> Self {
        Self {
            score,
            best_move: None,
        }
    }
}

/// Depth-bounded minimax with alpha-beta pruning. The machine maximizes.
///
/// Every node works on its own board copy produced by [`rollout`]; the
/// caller's board is never modified.
pub struct Search {
    evaluator: Evaluator,
    move_generator: MoveGenerator,
    max_depth: u32,
    pruning: bool,
    nodes_searched: u64,
}

impl Default for Search {
    fn default() -> Self {
        Self::new(Evaluator::new())
    }
}

impl Search {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            move_generator: MoveGenerator::new(),
            max_depth: 3,
            pruning: true,
            nodes_searched: 0,
        }
    }

    /// Best machine move at the configured depth.
    pub fn find_best_move(&mut self, board: &Board) -> Result<SearchResult, EngineError> {
        self.nodes_searched = 0;
        let start = Instant::now();

        let result = self.minimax(board, self.max_depth, true, f64::NEG_INFINITY, f64::INFINITY)?;

        debug!(
            "depth {} search: best {:?} score {:.3}, {} nodes in {:?}",
            self.max_depth,
            result.best_move.map(|mv| mv.to_string()),
            result.score,
            self.nodes_searched,
            start.elapsed()
        );
        Ok(result)
    }

    /// Best machine move among `candidates` only, each searched at the configured depth.
    pub fn best_among(
        &mut self,
        board: &Board,
        candidates: &[Move],
    ) -> Result<SearchResult, EngineError> {
        self.nodes_searched = 0;
        if self.max_depth == 0 || candidates.is_empty() {
            return Ok(SearchResult::leaf(self.evaluator.evaluate(board)));
        }
        self.search_moves(board, candidates, self.max_depth, true, f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        alpha: f64,
        beta: f64,
    ) -> Result<SearchResult, EngineError> {
        self.nodes_searched += 1;

        if self.move_generator.is_terminal(board) {
            let winner = self.move_generator.winner(board);
            return Ok(SearchResult::leaf(self.evaluator.evaluate_terminal(board, winner)));
        }
        if depth == 0 {
            return Ok(SearchResult::leaf(self.evaluator.evaluate(board)));
        }

        let side = if maximizing { Side::Machine } else { Side::Player };
        let moves = self.move_generator.generate_moves(board, side);
        if moves.is_empty() {
            return Ok(SearchResult::leaf(self.evaluator.evaluate(board)));
        }

        self.search_moves(board, &moves, depth, maximizing, alpha, beta)
    }

    fn search_moves(
        &mut self,
        board: &Board,
        moves: &[Move],
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<SearchResult, EngineError> {
        let mut best = SearchResult {
            score: if maximizing { f64::NEG_INFINITY } else { f64::INFINITY },
            best_move: None,
        };

        for &mv in moves {
            let child = rollout(&self.move_generator, board, mv)?;
            let score = self.minimax(&child, depth - 1, !maximizing, alpha, beta)?.score;

            if maximizing {
                if score > best.score {
                    best = SearchResult { score, best_move: Some(mv) };
                }
                alpha = alpha.max(score);
            } else {
                if score < best.score {
                    best = SearchResult { score, best_move: Some(mv) };
                }
                beta = beta.min(score);
            }

            if self.pruning && beta <= alpha {
                break;
            }
        }

        Ok(best)
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.max_depth = depth;
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Turning pruning off gives plain minimax over the same move order.
    pub fn set_pruning(&mut self, enabled: bool) {
        self.pruning = enabled;
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }
}
