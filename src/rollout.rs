use log::warn;

use crate::board::Board;
use crate::error::EngineError;
use crate::movegen::{Move, MoveGenerator};

/// Safety valve for chained captures; a side never has more than 12 pieces.
pub const MAX_CHAIN_CAPTURES: usize = 12;

/// Plays `mv` on a copy of `board` and, if it captured, keeps capturing with
/// the same piece (first generated capture each time) until it cannot.
///
/// One call covers a whole turn, so the search can treat a capture chain as a
/// single ply.
pub fn rollout(generator: &MoveGenerator, board: &Board, mv: Move) -> Result<Board, EngineError> {
    let mut next = board.clone();
    next.make_move(mv)?;
    if !mv.is_capture() {
        return Ok(next);
    }

    let mut landed = mv.to;
    let mut hops = 0;
    while hops < MAX_CHAIN_CAPTURES {
        let follow_up = match generator.capture_moves(&next, landed).first() {
            Some(&follow_up) => follow_up,
            None => return Ok(next),
        };
        next.make_move(follow_up)?;
        landed = follow_up.to;
        hops += 1;
    }

    if !generator.capture_moves(&next, landed).is_empty() {
        warn!(
            "rollout stopped after {} chained captures from {}",
            MAX_CHAIN_CAPTURES, mv.from
        );
    }
    Ok(next)
}
