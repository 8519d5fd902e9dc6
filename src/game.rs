use log::{info, warn};

use crate::board::{Board, Pos, Side};
use crate::difficulty::{Difficulty, MachinePlayer};
use crate::error::EngineError;
use crate::movegen::{GameState, Move, MoveGenerator};

/// Where the side to move is within its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingSelection,
    /// A capture landed and the same piece must keep capturing from here.
    CapturingChain(Pos),
    TurnComplete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub player_wins: u32,
    pub machine_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    fn record(&mut self, state: GameState) {
        match state {
            GameState::Won(Side::Player) => self.player_wins += 1,
            GameState::Won(Side::Machine) => self.machine_wins += 1,
            GameState::Draw => self.draws += 1,
            GameState::Ongoing => {}
        }
    }
}

/// Result of one hop played on the live board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub mv: Move,
    pub promoted: bool,
    /// The same side keeps moving with the piece on `mv.to`.
    pub continues: bool,
}

/// A live game: the board, whose turn it is and how far that turn has got.
pub struct Game {
    board: Board,
    to_move: Side,
    phase: TurnPhase,
    selected: Option<Pos>,
    machine_thinking: bool,
    difficulty: Difficulty,
    state: GameState,
    scoreboard: Scoreboard,
    machine: MachinePlayer,
    move_generator: MoveGenerator,
}

impl Game {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_machine(difficulty, MachinePlayer::new())
    }

    pub fn with_machine(difficulty: Difficulty, machine: MachinePlayer) -> Self {
        Self {
            board: Board::new(),
            to_move: Side::Player,
            phase: TurnPhase::AwaitingSelection,
            selected: None,
            machine_thinking: false,
            difficulty,
            state: GameState::Ongoing,
            scoreboard: Scoreboard::default(),
            machine,
            move_generator: MoveGenerator::new(),
        }
    }

    /// Fresh board, player to move. The scoreboard is kept.
    pub fn reset(&mut self) {
        self.set_position(Board::new());
        info!("board reset, difficulty {}", self.difficulty);
    }

    /// Starts from an arbitrary position with the player to move.
    ///
    /// A position that is already decided is reported through [`Game::state`]
    /// but never counted on the scoreboard.
    pub fn set_position(&mut self, board: Board) {
        self.board = board;
        self.to_move = Side::Player;
        self.selected = None;
        self.machine_thinking = false;
        self.state = self.move_generator.get_turn_state(&self.board, self.to_move);
        self.phase = if self.state.is_over() {
            info!("loaded a finished position: {:?}", self.state);
            TurnPhase::TurnComplete
        } else {
            TurnPhase::AwaitingSelection
        };
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.to_move
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn is_machine_thinking(&self) -> bool {
        self.machine_thinking
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!("difficulty set to {}", difficulty);
        self.difficulty = difficulty;
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// Moves the player may make right now, across all pieces.
    pub fn player_moves(&self) -> Vec<Move> {
        match self.phase {
            TurnPhase::CapturingChain(pos) => self.move_generator.capture_moves(&self.board, pos),
            _ => self.move_generator.generate_moves(&self.board, Side::Player),
        }
    }

    /// Selects a player piece and returns the moves to highlight for it.
    ///
    /// While a capture is compulsory a piece that cannot capture gets no
    /// moves and the selection is cleared.
    pub fn select(&mut self, pos: Pos) -> Result<Vec<Move>, EngineError> {
        self.ensure_player_can_act()?;
        if let TurnPhase::CapturingChain(chain) = self.phase {
            if chain != pos {
                return Err(EngineError::ChainInProgress(chain));
            }
        }

        let owned = self
            .board
            .get(pos)
            .map_or(false, |piece| piece.owner == Side::Player);
        let moves = if owned {
            self.move_generator.legal_moves(&self.board, pos)
        } else {
            Vec::new()
        };
        self.selected = if moves.is_empty() { None } else { Some(pos) };
        Ok(moves)
    }

    /// Plays one player hop. The turn passes to the machine unless the hop
    /// captured and the same piece can capture again.
    pub fn play(&mut self, from: Pos, to: Pos) -> Result<Hop, EngineError> {
        self.ensure_player_can_act()?;
        if let TurnPhase::CapturingChain(chain) = self.phase {
            if chain != from {
                return Err(EngineError::ChainInProgress(chain));
            }
        }

        let mv = self
            .player_moves()
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to)
            .ok_or(EngineError::IllegalMove(Move::new(from, to)))?;

        let hop = self.apply_hop(mv)?;
        if hop.continues {
            self.selected = Some(mv.to);
        } else {
            self.selected = None;
            self.end_turn();
        }
        Ok(hop)
    }

    /// Plays one machine hop. While a chain continues the "machine is
    /// deciding" flag stays raised and player input is refused.
    pub fn machine_step(&mut self) -> Result<Option<Hop>, EngineError> {
        if self.state.is_over() {
            return Err(EngineError::GameOver);
        }
        if self.to_move != Side::Machine {
            return Err(EngineError::NotYourTurn(self.to_move));
        }
        self.machine_thinking = true;

        let choice = match self.phase {
            TurnPhase::CapturingChain(from) => {
                self.machine
                    .choose_continuation(&self.board, from, self.difficulty)
            }
            _ => self.machine.choose_move(&self.board, self.difficulty),
        };
        let mv = match choice {
            Ok(Some(mv)) => mv,
            Ok(None) => {
                // The end-of-game check normally catches this first.
                warn!("machine has no move to play");
                self.end_turn();
                return Ok(None);
            }
            Err(err) => {
                self.machine_thinking = false;
                return Err(err);
            }
        };

        info!("machine plays {}", mv);
        let hop = match self.apply_hop(mv) {
            Ok(hop) => hop,
            Err(err) => {
                self.machine_thinking = false;
                return Err(err);
            }
        };
        if !hop.continues {
            self.end_turn();
        }
        Ok(Some(hop))
    }

    /// Plays the machine's whole turn and returns every hop in order.
    pub fn machine_turn(&mut self) -> Result<Vec<Hop>, EngineError> {
        let mut hops = Vec::new();
        while let Some(hop) = self.machine_step()? {
            hops.push(hop);
            if !hop.continues {
                break;
            }
        }
        Ok(hops)
    }

    fn ensure_player_can_act(&self) -> Result<(), EngineError> {
        if self.state.is_over() {
            return Err(EngineError::GameOver);
        }
        if self.machine_thinking {
            return Err(EngineError::MachineThinking);
        }
        if self.to_move != Side::Player {
            return Err(EngineError::NotYourTurn(self.to_move));
        }
        Ok(())
    }

    fn apply_hop(&mut self, mv: Move) -> Result<Hop, EngineError> {
        let promoted = self.board.make_move_logged(mv)?;
        let continues =
            mv.is_capture() && !self.move_generator.capture_moves(&self.board, mv.to).is_empty();
        self.phase = if continues {
            TurnPhase::CapturingChain(mv.to)
        } else {
            TurnPhase::TurnComplete
        };
        Ok(Hop { mv, promoted, continues })
    }

    fn end_turn(&mut self) {
        self.to_move = self.to_move.opposite();
        self.machine_thinking = false;
        self.phase = if self.check_game_end().is_over() {
            TurnPhase::TurnComplete
        } else {
            TurnPhase::AwaitingSelection
        };
    }

    fn check_game_end(&mut self) -> GameState {
        if self.state.is_over() {
            return self.state;
        }
        self.state = self.move_generator.get_turn_state(&self.board, self.to_move);
        if self.state.is_over() {
            self.scoreboard.record(self.state);
            match self.state {
                GameState::Won(side) => info!("game over: {} wins", side),
                _ => info!("game over: draw"),
            }
        }
        self.state
    }
}
