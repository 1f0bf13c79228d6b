//! Developer command line for the search engine.
//!
//! Runs perft and searches on a position, inspects parameter files and
//! regenerates magic multipliers.
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use anyhow::{anyhow, Context};
use chess_core::{Fen, Square};
use chess_engine::movegen::{AttackTables, MAGIC_SEED};
use chess_search::{Engine, ParamKind, Parameters, SearchLimits};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess")]
#[command(about = "Perft, search and parameter tools for the chess engine")]
struct Cli {
    /// Parameter file (TOML) to use instead of the built-in defaults
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PositionArgs {
    /// Position in FEN
    #[arg(long, default_value = Fen::STARTPOS)]
    fen: String,
    /// Moves to play first, in coordinate notation
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes of the legal move tree
    Perft {
        depth: u32,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Perft split by root move
    Divide {
        depth: u32,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Search a position and print the best move
    Search {
        #[command(flatten)]
        position: PositionArgs,
        /// Maximum depth in plies
        #[arg(short, long)]
        depth: Option<u32>,
        /// Time for the move in milliseconds
        #[arg(long)]
        movetime: Option<u64>,
        /// Node budget
        #[arg(long)]
        nodes: Option<u64>,
        /// Stop after finding a mate in this many moves
        #[arg(long)]
        mate: Option<u32>,
    },
    /// Print the static evaluation of a position
    Eval {
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Search magic multipliers for every square and print them
    Magics {
        /// Seed for the candidate generator
        #[arg(long, default_value_t = MAGIC_SEED)]
        seed: u64,
    },
    /// Inspect parameters
    Params {
        #[command(subcommand)]
        command: ParamsCommand,
    },
}

#[derive(Subcommand)]
enum ParamsCommand {
    /// Print every parameter as TOML
    Dump,
    /// Print one parameter by dotted name
    Get { name: String },
    /// List parameter names of one kind (eval, search or management)
    List { kind: ParamKind },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let params = match &cli.params {
        Some(path) => Parameters::load(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => Parameters::default(),
    };
    let mut engine = Engine::new(params);

    match cli.command {
        Commands::Perft { depth, position } => {
            setup(&mut engine, &position)?;
            let start = Instant::now();
            let nodes = engine.perft(depth)?;
            let elapsed = start.elapsed();
            println!("nodes {}", nodes);
            println!("time {}ms nps {}", elapsed.as_millis(), per_second(nodes, elapsed));
        }
        Commands::Divide { depth, position } => {
            setup(&mut engine, &position)?;
            let counts = engine.divide(depth)?;
            let total: u64 = counts.iter().map(|(_, n)| n).sum();
            for (m, n) in &counts {
                println!("{}: {}", m, n);
            }
            println!();
            println!("moves {} nodes {}", counts.len(), total);
        }
        Commands::Search {
            position,
            depth,
            movetime,
            nodes,
            mate,
        } => {
            setup(&mut engine, &position)?;
            let mut limits = SearchLimits {
                depth,
                nodes,
                mate,
                move_time: movetime.map(Duration::from_millis),
                ..Default::default()
            };
            if !limits.is_bounded() {
                limits.depth = Some(8);
            }
            search(engine, limits)?;
        }
        Commands::Eval { position } => {
            setup(&mut engine, &position)?;
            println!("eval cp {}", engine.evaluate()?);
        }
        Commands::Magics { seed } => {
            let start = Instant::now();
            let tables = AttackTables::generate(seed)?;
            for (name, magics) in [("rook", &tables.rook_magics), ("bishop", &tables.bishop_magics)] {
                for (sq, magic) in Square::all().zip(magics) {
                    println!("{} {} {:#018x} shift {}", name, sq, magic.magic, magic.shift);
                }
            }
            println!("time {}ms entries {}", start.elapsed().as_millis(), tables.attacks.len());
        }
        Commands::Params { command } => match command {
            ParamsCommand::Dump => print!("{}", engine.parameters().to_toml()?),
            ParamsCommand::Get { name } => println!("{} = {}", name, engine.parameter(&name)?),
            ParamsCommand::List { kind } => {
                for name in engine.parameter_names(kind) {
                    println!("{}", name);
                }
            }
        },
    }

    Ok(())
}

fn setup(engine: &mut Engine, position: &PositionArgs) -> anyhow::Result<()> {
    engine.set_position(&position.fen)?;
    for m in &position.moves {
        engine
            .play(m)
            .with_context(|| format!("Cannot play {} from {}", m, position.fen))?;
    }
    Ok(())
}

/// Runs a search, printing every report as it arrives.
fn search(mut engine: Engine, limits: SearchLimits) -> anyhow::Result<()> {
    let infos = engine.subscribe();
    let printer = std::thread::spawn(move || {
        for info in infos {
            println!("info {}", info);
        }
    });

    let outcome = engine.search(limits)?;
    // Closing the engine closes the channel and ends the printer.
    drop(engine);
    printer
        .join()
        .map_err(|_| anyhow!("Report printer panicked"))?;

    match (outcome.best_move, outcome.ponder_move) {
        (Some(best), Some(ponder)) => println!("bestmove {} ponder {}", best.to_uci(), ponder.to_uci()),
        (Some(best), None) => println!("bestmove {}", best.to_uci()),
        (None, _) => println!("bestmove (none)"),
    }
    Ok(())
}

fn per_second(count: u64, elapsed: Duration) -> u64 {
    let micros = elapsed.as_micros().max(1) as u64;
    count * 1_000_000 / micros
}
