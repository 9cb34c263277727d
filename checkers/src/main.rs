mod experiments;
mod input;
mod play;
mod render;

use anyhow::{Context, Result};
use checkers_agents::{
    play_match, search, search_parallel, Agent, Evaluator, Heuristic, MinimaxAgent, SearchConfig,
    SearchLimits, DEFAULT_DEPTH,
};
use checkers_core::{perft_detailed, perft_divide, positions, Board, Color, Game, GameStatus};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "checkers", version, about = "Checkers engine with alpha-beta search")]
struct Cli {
    /// Log search details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play against the engine
    Play {
        #[command(flatten)]
        engine: EngineArgs,
        /// Side you play
        #[arg(long, value_enum, default_value_t = Side::Black)]
        human: Side,
        #[command(flatten)]
        position: PositionArgs,
        /// Declare a draw after this many plies
        #[arg(long, default_value_t = 100)]
        max_plies: u32,
    },
    /// Let the engine play both sides
    Selfplay {
        #[command(flatten)]
        engine: EngineArgs,
        /// White's depth, when it differs from Black's
        #[arg(long)]
        white_depth: Option<u32>,
        /// White's heuristic, when it differs from Black's
        #[arg(long, value_enum)]
        white_heuristic: Option<HeuristicArg>,
        #[arg(long, default_value_t = 200)]
        max_plies: u32,
        /// Print only the result
        #[arg(short, long)]
        quiet: bool,
    },
    /// Search a position and print the best move
    Search {
        #[command(flatten)]
        engine: EngineArgs,
        #[command(flatten)]
        position: PositionArgs,
        /// Split root moves across threads
        #[arg(long)]
        parallel: bool,
    },
    /// Count move-tree leaves to a fixed depth
    Perft {
        depth: u8,
        #[command(flatten)]
        position: PositionArgs,
        /// Break the count down per root move
        #[arg(long)]
        divide: bool,
    },
    /// Play every Black depth against every White depth
    CompareDepths {
        #[arg(long, default_value_t = 6)]
        max_depth: u32,
        #[arg(long, value_enum, default_value_t = HeuristicArg::MaterialProximity)]
        heuristic: HeuristicArg,
        #[arg(long, default_value_t = 200)]
        max_plies: u32,
    },
    /// Material with proximity (Black) against composite (White) at equal depths
    CompareHeuristics {
        #[arg(long, default_value_t = 6)]
        max_depth: u32,
        #[arg(long, default_value_t = 200)]
        max_plies: u32,
    },
}

#[derive(Args, Clone, Copy)]
struct EngineArgs {
    /// Search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,
    /// Deepen iteratively within the node or time budget (a default node budget if neither is set)
    #[arg(long, conflicts_with = "depth")]
    unbounded: bool,
    #[arg(long, value_enum, default_value_t = HeuristicArg::MaterialProximity)]
    heuristic: HeuristicArg,
    /// Value of a king in men
    #[arg(long)]
    king_weight: Option<f64>,
    /// Node budget per search
    #[arg(long)]
    nodes: Option<u64>,
    /// Time budget per search in milliseconds
    #[arg(long)]
    move_time_ms: Option<u64>,
}

impl EngineArgs {
    fn config(&self) -> SearchConfig {
        let mut limits = if self.unbounded {
            SearchLimits::unbounded()
        } else {
            SearchLimits::depth(self.depth)
        };
        limits.nodes = self.nodes;
        if let Some(millis) = self.move_time_ms {
            limits = limits.with_move_time(millis);
        }

        let mut evaluator = Evaluator::new(self.heuristic.into());
        if let Some(weight) = self.king_weight {
            evaluator = evaluator.with_king_weight(weight);
        }
        SearchConfig::new(limits, evaluator)
    }
}

#[derive(Args, Clone)]
struct PositionArgs {
    /// Named position (starting, double-jump, crowning-chain) or a board diagram
    #[arg(long, default_value = "starting")]
    position: String,
    /// Side to move
    #[arg(long, value_enum, default_value_t = Side::Black)]
    to_move: Side,
}

impl PositionArgs {
    fn board(&self) -> Result<Board> {
        let diagram = match self.position.as_str() {
            "starting" => positions::STARTING,
            "double-jump" => positions::DOUBLE_JUMP,
            "crowning-chain" => positions::CROWNING_CHAIN,
            other => other,
        };
        Board::from_diagram(diagram).with_context(|| format!("invalid position '{}'", self.position))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    Black,
    White,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Color::Black,
            Side::White => Color::White,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeuristicArg {
    Material,
    MaterialProximity,
    Composite,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Material => Heuristic::Material,
            HeuristicArg::MaterialProximity => Heuristic::MaterialProximity,
            HeuristicArg::Composite => Heuristic::Composite,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_search(engine: &EngineArgs, position: &PositionArgs, parallel: bool) -> Result<()> {
    let board = position.board()?;
    let color: Color = position.to_move.into();
    let config = engine.config();

    render::draw_position(&mut io::stdout(), &board, color, None)?;
    match config.limits.max_depth {
        Some(depth) => println!("Searching to depth {depth}..."),
        None => println!("Searching without a depth limit..."),
    }

    let start = Instant::now();
    let result = if parallel {
        search_parallel(&board, color, &config)?
    } else {
        search(&board, color, &config)?
    };
    let elapsed = start.elapsed();

    match &result.best {
        Some(best) => {
            println!("\nBest move: {}", best.mv);
            println!("Score: {:.4}", result.score);
            println!("Depth: {}", result.depth);
            println!("Nodes: {}", result.nodes);
            println!("Time: {:.2}s", elapsed.as_secs_f64());
            println!("NPS: {:.0}", result.nodes as f64 / elapsed.as_secs_f64());
            if result.stopped {
                println!("(search stopped by its budget)");
            }
            render::draw_position(&mut io::stdout(), &best.board, color.opponent(), Some(&best.mv))?;
        }
        None => println!("No legal moves available"),
    }
    Ok(())
}

fn run_perft(depth: u8, position: &PositionArgs, divide: bool) -> Result<()> {
    let board = position.board()?;
    let color: Color = position.to_move.into();

    println!("Running perft({depth})...");
    println!("Position: {}", board.to_diagram());

    if divide {
        let results = perft_divide(&board, color, depth)?;
        let mut total = 0;
        for (mv, count) in &results {
            println!("{mv}: {count}");
            total += count;
        }
        println!("\nTotal: {total}");
    } else {
        let start = Instant::now();
        let results = perft_detailed(&board, color, depth)?;
        let elapsed = start.elapsed();

        println!("Nodes: {}", results.nodes);
        println!("Captures: {}", results.captures);
        println!("Multi-captures: {}", results.multi_captures);
        println!("Promotions: {}", results.promotions);
        println!("Time: {:.2}s", elapsed.as_secs_f64());
        println!("NPS: {:.0}", results.nodes as f64 / elapsed.as_secs_f64());
    }
    Ok(())
}

fn run_selfplay(
    engine: &EngineArgs,
    white_depth: Option<u32>,
    white_heuristic: Option<HeuristicArg>,
    max_plies: u32,
    quiet: bool,
) -> Result<()> {
    let mut white_args = *engine;
    if let Some(depth) = white_depth {
        white_args.depth = depth;
    }
    if let Some(heuristic) = white_heuristic {
        white_args.heuristic = heuristic;
    }

    let mut black = MinimaxAgent::with_config(engine.config());
    let mut white = MinimaxAgent::with_config(white_args.config());
    println!("Black: {} | White: {}", black.name(), white.name());

    let record = play_match(&mut black, &mut white, max_plies)?;

    if !quiet {
        // Replay for display
        let mut game = Game::new();
        for mv in &record.moves {
            game.play(mv)?;
            println!("{} {}", game.ply, mv);
            render::draw_position(&mut io::stdout(), &game.board, game.turn, Some(mv))?;
        }
    }

    match record.status {
        GameStatus::Won(color) => println!("{color} won after {} plies", record.plies),
        GameStatus::Draw => println!(
            "Draw after {} plies (Black {} - White {} pieces)",
            record.plies, record.black_pieces, record.white_pieces
        ),
        GameStatus::InProgress => println!("Game stopped after {} plies", record.plies),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Play {
            engine,
            human,
            position,
            max_plies,
        } => {
            let human: Color = human.into();
            let start = Game::from_position(position.board()?, position.to_move.into())
                .with_ply_limit(max_plies);
            let agent = MinimaxAgent::with_config(engine.config());
            play::InteractiveGame::new(start, human, agent).run()?;
        }
        Command::Selfplay {
            engine,
            white_depth,
            white_heuristic,
            max_plies,
            quiet,
        } => run_selfplay(&engine, white_depth, white_heuristic, max_plies, quiet)?,
        Command::Search {
            engine,
            position,
            parallel,
        } => run_search(&engine, &position, parallel)?,
        Command::Perft {
            depth,
            position,
            divide,
        } => run_perft(depth, &position, divide)?,
        Command::CompareDepths {
            max_depth,
            heuristic,
            max_plies,
        } => {
            let grid = experiments::compare_depths(max_depth, heuristic.into(), max_plies)?;
            print!("{grid}");
        }
        Command::CompareHeuristics {
            max_depth,
            max_plies,
        } => {
            let duel = experiments::compare_heuristics(max_depth, max_plies)?;
            print!("{duel}");
        }
    }

    Ok(())
}
