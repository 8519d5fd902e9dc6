pub mod board;
pub mod console;
pub mod difficulty;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod rollout;
pub mod search;

use board::{Board, Pos, Side};
use difficulty::{Difficulty, MachinePlayer};
use error::EngineError;
use movegen::{GameState, Move, MoveGenerator};

/// Every move `side` may make this turn.
pub fn legal_moves_for_side(board: &Board, side: Side) -> Vec<Move> {
    MoveGenerator::new().generate_moves(board, side)
}

/// Moves to highlight for the piece on `pos`.
pub fn legal_moves(board: &Board, pos: Pos) -> Vec<Move> {
    MoveGenerator::new().legal_moves(board, pos)
}

/// Commits one move to the board. Returns whether the piece was crowned.
pub fn apply_move(board: &mut Board, mv: Move) -> Result<bool, EngineError> {
    board.make_move(mv)
}

/// `None` while the game goes on, otherwise the final state.
///
/// This is the turn-independent check the search uses: the game is over as
/// soon as either side has no pieces or no legal move. A live [`game::Game`]
/// judges with [`MoveGenerator::get_turn_state`] instead, which only asks the
/// side to move for a legal move.
pub fn is_game_over(board: &Board) -> Option<GameState> {
    match MoveGenerator::new().get_game_state(board) {
        GameState::Ongoing => None,
        state => Some(state),
    }
}

/// Picks the machine's next move with a one-off player.
pub fn choose_machine_move(
    board: &Board,
    difficulty: Difficulty,
) -> Result<Option<Move>, EngineError> {
    MachinePlayer::new().choose_move(board, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::{Piece, Rank};
    use evaluation::Evaluator;
    use pretty_assertions::assert_eq;
    use search::Search;

    const JITTER_TOLERANCE: f64 = 0.02;

    fn deterministic_search(depth: u32) -> Search {
        let mut search = Search::new(Evaluator::deterministic());
        search.set_max_depth(depth);
        search
    }

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        assert_eq!(board.count(Side::Player), 12);
        assert_eq!(board.count(Side::Machine), 12);
        assert!(Pos::all().filter(|&pos| !board.is_empty(pos)).all(|pos| pos.is_dark()));
        assert_eq!(is_game_over(&board), None);
    }

    #[test]
    fn test_opening_move() {
        let mut board = Board::new();
        let mv = Move::new(Pos::new(2, 1), Pos::new(3, 0));
        assert!(legal_moves(&board, Pos::new(2, 1)).contains(&mv));

        let promoted = apply_move(&mut board, mv).unwrap();
        assert!(!promoted);
        assert!(board.is_empty(Pos::new(2, 1)));
        assert_eq!(board.get(Pos::new(3, 0)), Some(Piece::man(Side::Player)));
    }

    #[test]
    fn test_man_capture_scenario() {
        let mut board = Board::empty();
        board.place(Pos::new(5, 2), Piece::man(Side::Machine));
        board.place(Pos::new(4, 3), Piece::man(Side::Player));

        let captures = MoveGenerator::new().capture_moves(&board, Pos::new(5, 2));
        assert_eq!(
            captures,
            vec![Move::new_capture(Pos::new(5, 2), Pos::new(3, 4), Pos::new(4, 3))]
        );
    }

    #[test]
    fn test_man_capture_removes_one_piece_two_cells_away() {
        let generator = MoveGenerator::new();
        let mut board = Board::from_diagram(
            "......../......../..m.m.../...p..../......../......../......../........",
        )
        .unwrap();
        let captures = generator.mandatory_captures(&board, Side::Machine);
        assert_eq!(captures.len(), 2);
        for mv in captures {
            let mut next = board.clone();
            assert!(next.is_empty(mv.to));
            next.make_move(mv).unwrap();
            assert_eq!(next.count(Side::Player), board.count(Side::Player) - 1);
            assert_eq!((mv.to.row as i8 - mv.from.row as i8).abs(), 2);
            assert_eq!((mv.to.col as i8 - mv.from.col as i8).abs(), 2);
        }
        board.clear(Pos::new(4, 3));
        assert!(generator.mandatory_captures(&board, Side::Machine).is_empty());
    }

    #[test]
    fn test_king_slide_scenario() {
        let mut board = Board::empty();
        board.place(Pos::new(4, 4), Piece::king(Side::Player));
        board.place(Pos::new(0, 0), Piece::man(Side::Player));

        let moves = MoveGenerator::new().normal_moves(&board, Pos::new(4, 4));
        let towards_corner: Vec<Pos> = moves
            .iter()
            .map(|mv| mv.to)
            .filter(|to| to.row == to.col && to.row < 4)
            .collect();
        assert_eq!(
            towards_corner,
            vec![Pos::new(3, 3), Pos::new(2, 2), Pos::new(1, 1)]
        );

        board.clear(Pos::new(0, 0));
        let moves = MoveGenerator::new().normal_moves(&board, Pos::new(4, 4));
        assert!(moves.iter().any(|mv| mv.to == Pos::new(0, 0)));
        // Every diagonal to the edge: 4 + 3 + 3 + 3.
        assert_eq!(moves.len(), 13);
    }

    #[test]
    fn test_mandatory_capture_property() {
        let generator = MoveGenerator::new();
        let boards = [
            Board::new(),
            Board::from_diagram(
                "m.m.m.m./.m.m.m.m/......../...m..../..p...../.p...p.p/p.p.p.p./.p.p.p.p",
            )
            .unwrap(),
            Board::from_diagram(
                "......../......../...M..../......../.p...p../......../...m..../P.......",
            )
            .unwrap(),
        ];
        for board in &boards {
            for side in [Side::Player, Side::Machine] {
                if generator.mandatory_captures(board, side).is_empty() {
                    continue;
                }
                for (pos, _) in board.pieces(side) {
                    assert!(generator.legal_moves(board, pos).iter().all(Move::is_capture));
                }
                assert!(generator.generate_moves(board, side).iter().all(Move::is_capture));
            }
        }
    }

    #[test]
    fn test_promotion() {
        let mut board = Board::empty();
        board.place(Pos::new(6, 1), Piece::man(Side::Player));
        board.place(Pos::new(1, 2), Piece::man(Side::Machine));
        board.place(Pos::new(3, 3), Piece::king(Side::Machine));

        assert!(apply_move(&mut board, Move::new(Pos::new(6, 1), Pos::new(7, 0))).unwrap());
        assert_eq!(board.get(Pos::new(7, 0)).unwrap().rank, Rank::King);

        assert!(apply_move(&mut board, Move::new(Pos::new(1, 2), Pos::new(0, 1))).unwrap());
        assert_eq!(board.get(Pos::new(0, 1)).unwrap().rank, Rank::King);

        // Kings stay kings, wherever they land.
        assert!(!apply_move(&mut board, Move::new(Pos::new(3, 3), Pos::new(0, 6))).unwrap());
        assert_eq!(board.get(Pos::new(0, 6)), Some(Piece::king(Side::Machine)));

        // A man that does not reach the far row keeps its rank.
        let mut board = Board::new();
        assert!(!apply_move(&mut board, Move::new(Pos::new(5, 0), Pos::new(4, 1))).unwrap());
        assert_eq!(board.get(Pos::new(4, 1)), Some(Piece::man(Side::Machine)));
    }

    #[test]
    fn test_executor_rejects_broken_moves() {
        let mut board = Board::new();
        let before = board.clone();
        assert_eq!(
            apply_move(&mut board, Move::new(Pos::new(3, 0), Pos::new(4, 1))),
            Err(EngineError::EmptySource(Pos::new(3, 0)))
        );
        assert_eq!(
            apply_move(
                &mut board,
                Move::new_capture(Pos::new(2, 1), Pos::new(4, 3), Pos::new(3, 2))
            ),
            Err(EngineError::MissingCapture(Pos::new(3, 2)))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_terminal_when_a_side_is_wiped_out() {
        let generator = MoveGenerator::new();

        let mut board = Board::empty();
        board.place(Pos::new(7, 0), Piece::man(Side::Machine));
        assert!(generator.is_terminal(&board));
        assert_eq!(generator.winner(&board), Some(Side::Machine));
        assert_eq!(is_game_over(&board), Some(GameState::Won(Side::Machine)));

        // Even when the surviving side cannot move.
        let mut board = Board::empty();
        board.place(Pos::new(7, 7), Piece::man(Side::Player));
        assert!(generator.is_terminal(&board));
        assert_eq!(generator.winner(&board), Some(Side::Player));
    }

    #[test]
    fn test_search_takes_winning_capture() {
        let mut board = Board::empty();
        board.place(Pos::new(5, 2), Piece::man(Side::Machine));
        board.place(Pos::new(4, 3), Piece::man(Side::Player));

        let mut search = deterministic_search(3);
        let result = search.find_best_move(&board).unwrap();
        assert_eq!(
            result.best_move,
            Some(Move::new_capture(Pos::new(5, 2), Pos::new(3, 4), Pos::new(4, 3)))
        );
        assert!(result.score > 900.0);
    }

    #[test]
    fn test_search_leaves_caller_board_alone() {
        let board = Board::new();
        let before = board.clone();
        let mut search = deterministic_search(3);
        search.find_best_move(&board).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_is_game_over_ignores_side_to_move() {
        // The machine man on h1 is stuck; the player can still move.
        let board = Board::from_diagram(
            "......../......../......../......../......../.p....../......../.......m",
        )
        .unwrap();
        assert_eq!(is_game_over(&board), Some(GameState::Won(Side::Player)));
        assert_eq!(
            MoveGenerator::new().get_turn_state(&board, Side::Player),
            GameState::Ongoing
        );
    }

    #[test]
    fn test_search_depth_monotonic() {
        // Machine: b3 can crown in two moves, e8 gains most by leaving the
        // back row. Player: g2 and h1 are far from both.
        let board = Board::from_diagram(
            "....m.../......../......../......../......../.m....../......p./.......p",
        )
        .unwrap();
        let base = Evaluator::deterministic().evaluate_static(&board);

        let mut search = Search::new(Evaluator::seeded(9));
        let mut scores = Vec::new();
        for depth in 1..=4 {
            search.set_max_depth(depth);
            scores.push(search.find_best_move(&board).unwrap().score - base);
        }
        for pair in scores.windows(2) {
            assert!(pair[1] >= pair[0] - JITTER_TOLERANCE, "scores by depth: {:?}", scores);
        }
        // Depth 3 is the first to see the crowning.
        let expected = [0.15, 0.20, 0.95, 1.00];
        for (score, want) in scores.iter().zip(expected) {
            assert!((score - want).abs() < JITTER_TOLERANCE, "scores by depth: {:?}", scores);
        }
    }

    #[test]
    fn test_alpha_beta_matches_full_minimax() {
        let boards = [
            Board::new(),
            Board::from_diagram(
                "m.m.m.m./.m.m.m.m/..m...../...p..../......../.p.p.p.p/p.p.p.p./.p.p.p.p",
            )
            .unwrap(),
        ];
        for board in &boards {
            for depth in 1..=4 {
                let mut pruned = deterministic_search(depth);
                let mut full = deterministic_search(depth);
                full.set_pruning(false);

                let a = pruned.find_best_move(board).unwrap();
                let b = full.find_best_move(board).unwrap();
                assert!(
                    (a.score - b.score).abs() < 1e-9,
                    "depth {}: {} vs {}",
                    depth,
                    a.score,
                    b.score
                );
                assert!(pruned.get_nodes_searched() <= full.get_nodes_searched());

                // The chosen move is worth the full-width best score.
                let generator = MoveGenerator::new();
                let child = rollout::rollout(&generator, board, a.best_move.unwrap()).unwrap();
                let replay = full
                    .minimax(&child, depth - 1, false, f64::NEG_INFINITY, f64::INFINITY)
                    .unwrap();
                assert!((replay.score - b.score).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_choose_machine_move_is_legal() {
        let board = Board::new();
        let legal = legal_moves_for_side(&board, Side::Machine);
        for difficulty in [Difficulty::Easy, Difficulty::Medium] {
            let mv = choose_machine_move(&board, difficulty).unwrap().unwrap();
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn test_diagram_round_trip() {
        let board = Board::new();
        let diagram = board.to_diagram();
        assert_eq!(
            diagram,
            "m.m.m.m./.m.m.m.m/m.m.m.m./......../......../.p.p.p.p/p.p.p.p./.p.p.p.p"
        );
        assert_eq!(Board::from_diagram(&diagram).unwrap(), board);
        assert!(matches!(
            Board::from_diagram("m.m.m.m./.m.m"),
            Err(EngineError::InvalidDiagram(_))
        ));
        assert!(matches!(
            Board::from_diagram(
                "x......./......../......../......../......../......../......../........"
            ),
            Err(EngineError::InvalidDiagram(_))
        ));
    }

    #[test]
    fn test_square_notation() {
        assert_eq!("b3".parse::<Pos>().unwrap(), Pos::new(2, 1));
        assert_eq!(Pos::new(7, 7).to_string(), "h8");
        assert!("i1".parse::<Pos>().is_err());
        assert!("a9".parse::<Pos>().is_err());
        assert_eq!(
            Move::new_capture(Pos::new(2, 1), Pos::new(4, 3), Pos::new(3, 2)).to_string(),
            "b3xd5"
        );
    }
}
