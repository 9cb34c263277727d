use crate::input::{describe_moves, select_move, select_piece, select_target};
use crate::render::draw_position;
use anyhow::Result;
use checkers_agents::{Agent, MinimaxAgent};
use checkers_core::{Color, Game, GameStatus, Successor};
use std::io::{self, BufRead, Write};
use tracing::debug;

enum Command {
    Move(Successor),
    Undo,
    Quit,
}

/// Line-based game of a human against the engine.
pub struct InteractiveGame {
    start: Game,
    game: Game,
    human: Color,
    engine: MinimaxAgent,
}

impl InteractiveGame {
    pub fn new(start: Game, human: Color, engine: MinimaxAgent) -> Self {
        Self {
            game: start.clone(),
            start,
            human,
            engine,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stdout = io::stdout();

        println!("Checkers - you play {}", self.human);
        println!("Enter a piece then its target (e.g. c2, then d1), or a whole move (c2-d1, d3xf5xh7)");
        println!("Commands: 'moves', 'undo', 'quit'");
        println!("Engine: {}", self.engine.name());

        loop {
            draw_position(&mut stdout, &self.game.board, self.game.turn, self.game.moves().last())?;

            match self.game.status() {
                GameStatus::Won(color) => {
                    println!("{color} won!");
                    break;
                }
                GameStatus::Draw => {
                    println!("Draw after {} plies", self.game.ply);
                    break;
                }
                GameStatus::InProgress => {}
            }

            if self.game.turn == self.human {
                match self.human_turn(&mut input)? {
                    Command::Move(successor) => {
                        println!("The move made is {}", successor.mv);
                        self.game.apply(successor)?;
                    }
                    Command::Undo => self.undo()?,
                    Command::Quit => break,
                }
            } else {
                println!("Engine thinking...");
                match self.engine.choose(&self.game.board, self.game.turn)? {
                    Some(successor) => {
                        println!("Engine plays: {}", successor.mv);
                        self.game.apply(successor)?;
                    }
                    // Status reports the engine's loss on the next pass
                    None => continue,
                }
            }
        }

        Ok(())
    }

    fn human_turn(&self, input: &mut impl BufRead) -> Result<Command> {
        let legal = self.game.legal_moves()?;

        loop {
            let Some(line) = prompt(input, "Your move: ")? else {
                return Ok(Command::Quit);
            };

            match line.as_str() {
                "" => continue,
                "quit" | "q" => return Ok(Command::Quit),
                "undo" | "u" => return Ok(Command::Undo),
                "moves" | "m" => {
                    println!("Legal moves: {}", describe_moves(&legal));
                    continue;
                }
                _ => {}
            }

            // A whole move on one line
            if line.split_whitespace().count() > 1 || line.contains(['-', 'x', 'X']) {
                match select_move(&legal, &line) {
                    Ok(successor) => return Ok(Command::Move(successor)),
                    Err(e) => {
                        println!("{e}. Please enter again.");
                        continue;
                    }
                }
            }

            let from = match select_piece(&legal, &line) {
                Ok(from) => from,
                Err(e) => {
                    println!("The piece is not valid: {e}. Please enter again.");
                    continue;
                }
            };

            loop {
                let Some(target) = prompt(input, "Move to: ")? else {
                    return Ok(Command::Quit);
                };
                match select_target(&legal, from, &target) {
                    Ok(successor) => return Ok(Command::Move(successor)),
                    Err(e) => println!("The move is not valid: {e}. Please enter again."),
                }
            }
        }
    }

    /// Takes back the last human move together with the engine reply.
    fn undo(&mut self) -> Result<()> {
        let mut moves = self.game.moves().to_vec();
        let take_back = if self.game.turn == self.human { 2 } else { 1 };
        if moves.len() < take_back {
            println!("Nothing to undo");
            return Ok(());
        }
        moves.truncate(moves.len() - take_back);

        // Rebuild position
        let mut game = self.start.clone();
        for mv in &moves {
            game.play(mv)?;
        }
        debug!(plies = game.ply, "undo");
        self.game = game;
        println!("Undid last move");
        Ok(())
    }
}

/// Reads one trimmed line; `None` at end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
