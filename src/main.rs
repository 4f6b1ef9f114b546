//! MTG Judge - Main Binary
//!
//! Plays single matches or runs experiments between built-in strategies

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mtg_judge::{
    config::GameConfig,
    core::Color,
    experiment::ExperimentSimulator,
    game::{GameLogger, SteppingJudge, VerbosityLevel},
    loader::{CardLoader, CardPool, DeckList, DeckLoader, DefinitionFactory, PlayerDefinition, StrategyKind},
    simulator::GameSimulator,
};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

/// Strategy type for a player
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Always takes the first legal action, never attacks or blocks
    Zero,
    /// Makes random choices
    Random,
    /// Plays out its hand and attacks with everything
    Aggressive,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Zero => StrategyKind::Zero,
            StrategyArg::Random => StrategyKind::Random,
            StrategyArg::Aggressive => StrategyKind::Aggressive,
        }
    }
}

/// Built-in deck name (white/blue/black/red/green) or path to a .dck file
#[derive(Debug, Clone)]
enum DeckArg {
    Sample(Color),
    File(PathBuf),
}

impl std::str::FromStr for DeckArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let color = match s.to_lowercase().as_str() {
            "white" | "w" => Color::White,
            "blue" | "u" => Color::Blue,
            "black" | "b" => Color::Black,
            "red" | "r" => Color::Red,
            "green" | "g" => Color::Green,
            _ => return Ok(DeckArg::File(PathBuf::from(s))),
        };
        Ok(DeckArg::Sample(color))
    }
}

impl DeckArg {
    fn load(&self) -> Result<DeckList> {
        match self {
            DeckArg::Sample(color) => Ok(DeckList::sample(*color)),
            DeckArg::File(path) => {
                DeckLoader::load_from_file(path).with_context(|| format!("loading deck {}", path.display()))
            }
        }
    }
}

/// Options shared by both subcommands
#[derive(clap::Args, Debug)]
struct MatchArgs {
    /// Deck for player 1: a color for a built-in deck, or a .dck file
    #[arg(long, default_value = "green")]
    deck1: DeckArg,

    /// Deck for player 2: a color for a built-in deck, or a .dck file
    #[arg(long, default_value = "red")]
    deck2: DeckArg,

    /// Player 1 strategy
    #[arg(long, value_enum, default_value = "aggressive")]
    p1: StrategyArg,

    /// Player 2 strategy
    #[arg(long, value_enum, default_value = "random")]
    p2: StrategyArg,

    /// Extra card scripts to add to the built-in card pool
    #[arg(long, value_name = "CARD_FILE")]
    cards: Vec<PathBuf>,

    /// Match configuration (JSON); missing fields use the defaults
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Stop a match without a winner after this many turns
    #[arg(long)]
    max_turns: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
#[command(name = "judge")]
#[command(about = "MTG Judge - two-player tabletop rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single match
    Play {
        #[command(flatten)]
        args: MatchArgs,

        /// Player 1 name
        #[arg(long, default_value = "Player 1")]
        p1_name: String,

        /// Player 2 name
        #[arg(long, default_value = "Player 2")]
        p2_name: String,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityLevel>,

        /// Show the tabletop after every phase and wait for Enter
        #[arg(long)]
        step: bool,
    },

    /// Run many matches in parallel and report statistics
    Experiment {
        #[command(flatten)]
        args: MatchArgs,

        /// Number of matches to run
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            args,
            p1_name,
            p2_name,
            verbosity,
            step,
        } => run_play(args, p1_name, p2_name, verbosity, step),
        Commands::Experiment { args, games, json } => run_experiment(args, games, json),
    }
}

fn load_config(args: &MatchArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load_from_file(path).with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(max_turns) = args.max_turns {
        config = config.with_max_turns(max_turns);
    }
    Ok(config)
}

fn load_factory(card_files: &[PathBuf]) -> Result<DefinitionFactory> {
    let mut pool = CardPool::builtin().context("parsing built-in cards")?;
    for path in card_files {
        pool.extend(load_cards(path)?);
    }
    Ok(DefinitionFactory::new(pool))
}

fn load_cards(path: &Path) -> Result<Vec<mtg_judge::loader::CardDefinition>> {
    CardLoader::load_from_file(path).with_context(|| format!("loading cards {}", path.display()))
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

fn run_play(
    args: MatchArgs,
    p1_name: String,
    p2_name: String,
    verbosity: Option<VerbosityLevel>,
    step: bool,
) -> Result<()> {
    let mut config = load_config(&args)?;
    if let Some(verbosity) = verbosity {
        config = config.with_verbosity(verbosity);
    }
    let factory = load_factory(&args.cards)?;
    let players = vec![
        PlayerDefinition::new(p1_name, args.deck1.load()?, args.p1.into()),
        PlayerDefinition::new(p2_name, args.deck2.load()?, args.p2.into()),
    ];
    let seed = resolve_seed(args.seed);

    let logger = Rc::new(GameLogger::with_verbosity(config.verbosity));
    let simulator = GameSimulator::new(config).with_observer(logger.clone());
    logger.minimal(&format!("=== MTG Judge === (seed {seed})"));

    let (mut tabletop, _) = simulator.prepare(&factory, &players, seed)?;
    let summary = if step {
        let mut judge = SteppingJudge::new(simulator.round_judge());
        simulator.play(&mut tabletop, &mut judge)?
    } else {
        let mut judge = simulator.round_judge();
        simulator.play(&mut tabletop, &mut judge)?
    };

    logger.minimal(&format!(
        "\n=== Game Over ===\n{} after {} turns ({:?})",
        summary.winner_name.as_deref().unwrap_or("Draw"),
        summary.turns_played,
        summary.end_reason
    ));
    for player in &summary.players {
        logger.minimal(&format!("  {} ({}): {} life", player.name, player.deck, player.life));
    }
    Ok(())
}

fn run_experiment(args: MatchArgs, games: usize, json: bool) -> Result<()> {
    let config = load_config(&args)?;
    let factory = Arc::new(load_factory(&args.cards)?);
    let players = vec![
        PlayerDefinition::new("Player 1", args.deck1.load()?, args.p1.into()),
        PlayerDefinition::new("Player 2", args.deck2.load()?, args.p2.into()),
    ];
    let seed = resolve_seed(args.seed);

    if !json {
        println!("=== MTG Judge - Experiment Mode ===\n");
        println!("Running {games} games with seed {seed}");
        println!("Strategies: P1={:?}, P2={:?}\n", args.p1, args.p2);
    }

    let start = Instant::now();
    let experiment = ExperimentSimulator::new(config, factory, players);
    let summary = experiment.run(games, seed)?;
    let elapsed = start.elapsed();

    if json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{summary}");
        println!("Elapsed time: {:.2}s", elapsed.as_secs_f64());
        println!("Games per second: {:.2}", games as f64 / elapsed.as_secs_f64());
    }
    Ok(())
}
