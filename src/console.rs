use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::board::{Board, Pos, Side};
use crate::difficulty::Difficulty;
use crate::game::{Game, Hop};
use crate::movegen::{GameState, Move};

const HELP: &str = "\
commands:
  new                    start a new game (score is kept)
  board                  show the board
  moves [square]         list your legal moves, optionally for one piece
  select <square>        select a piece and list its moves
  move <from> <to>       play a move, e.g. move b3 a4
  difficulty <level>     easy, medium or hard
  position <diagram>     load 8 rows separated by '/', top row first
  score                  show the scoreboard
  quit
";

/// Line-based front end for playing in a terminal.
pub struct ConsoleHandler {
    game: Game,
}

impl ConsoleHandler {
    pub fn new(game: Game) -> Self {
        ConsoleHandler { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        print!("{}", self.game.board());
        stdout.flush()?;
        while reader.read_line(&mut line)? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }
            match self.handle_command(command) {
                Ok(response) => print!("{}", response),
                Err(err) => println!("error: {}", err),
            }
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok("".to_string());
        }

        match parts[0] {
            "new" => Ok(self.handle_new()),
            "board" => Ok(self.game.board().to_string()),
            "moves" => self.handle_moves(&parts[1..]),
            "select" => self.handle_select(&parts[1..]),
            "move" => self.handle_move(&parts[1..]),
            "difficulty" => Ok(self.handle_difficulty(&parts[1..])),
            "position" => self.handle_position(&parts[1..]),
            "score" => Ok(self.format_score()),
            "help" => Ok(HELP.to_string()),
            "quit" => Ok("".to_string()),
            other => Ok(format!("unknown command {:?}, try help\n", other)),
        }
    }

    fn handle_new(&mut self) -> String {
        self.game.reset();
        self.game.board().to_string()
    }

    fn handle_moves(&self, parts: &[&str]) -> Result<String> {
        let moves: Vec<Move> = match parts.first() {
            Some(square) => {
                let pos: Pos = square.parse()?;
                self.game
                    .player_moves()
                    .into_iter()
                    .filter(|mv| mv.from == pos)
                    .collect()
            }
            None => self.game.player_moves(),
        };
        Ok(format_moves(&moves))
    }

    fn handle_select(&mut self, parts: &[&str]) -> Result<String> {
        let square = parts
            .first()
            .ok_or_else(|| anyhow::anyhow!("usage: select <square>"))?;
        let moves = self.game.select(square.parse()?)?;
        Ok(format_moves(&moves))
    }

    fn handle_move(&mut self, parts: &[&str]) -> Result<String> {
        if parts.len() != 2 {
            anyhow::bail!("usage: move <from> <to>");
        }
        let from: Pos = parts[0].parse()?;
        let to: Pos = parts[1].parse()?;

        let mut response = String::new();
        let hop = self.game.play(from, to)?;
        writeln!(response, "you play {}", describe(&hop))?;
        if hop.continues {
            writeln!(response, "capture again with {}", hop.mv.to)?;
            response.push_str(&self.game.board().to_string());
            return Ok(response);
        }

        if self.game.state() == GameState::Ongoing && self.game.side_to_move() == Side::Machine {
            for hop in self.game.machine_turn()? {
                writeln!(response, "machine plays {}", describe(&hop))?;
            }
        }
        response.push_str(&self.game.board().to_string());
        response.push_str(&self.format_outcome());
        Ok(response)
    }

    fn handle_difficulty(&mut self, parts: &[&str]) -> String {
        match parts.first() {
            Some(label) => {
                self.game.set_difficulty(Difficulty::from_label(label));
                format!("difficulty {}\n", self.game.difficulty())
            }
            None => format!("difficulty {}\n", self.game.difficulty()),
        }
    }

    fn handle_position(&mut self, parts: &[&str]) -> Result<String> {
        let diagram = parts.join("");
        let board = Board::from_diagram(&diagram)?;
        self.game.set_position(board);
        let mut response = self.game.board().to_string();
        response.push_str(&self.format_outcome());
        Ok(response)
    }

    fn format_outcome(&self) -> String {
        match self.game.state() {
            GameState::Ongoing => "".to_string(),
            GameState::Won(Side::Player) => format!("you win! {}", self.format_score()),
            GameState::Won(Side::Machine) => format!("the machine wins! {}", self.format_score()),
            GameState::Draw => format!("draw. {}", self.format_score()),
        }
    }

    fn format_score(&self) -> String {
        let score = self.game.scoreboard();
        format!(
            "score: you {} x {} machine ({} drawn)\n",
            score.player_wins, score.machine_wins, score.draws
        )
    }
}

fn describe(hop: &Hop) -> String {
    if hop.promoted {
        format!("{} (crowned)", hop.mv)
    } else {
        hop.mv.to_string()
    }
}

fn format_moves(moves: &[Move]) -> String {
    if moves.is_empty() {
        return "no moves\n".to_string();
    }
    let list: Vec<String> = moves.iter().map(Move::to_string).collect();
    format!("{}\n", list.join(" "))
}
