use crate::driver::drive_to_completion;
use kolkhoz_bot::{GreedyStrategy, RandomStrategy, Strategy};
use kolkhoz_core::game::error::GameError;
use kolkhoz_core::game::serialization::{GameSnapshot, SnapshotError};
use kolkhoz_core::game::state::GameState;
use kolkhoz_core::model::variants::{DeckType, VariantConfig};
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "\
kolkhoz - five-year-plan card game simulator

USAGE:
    kolkhoz simulate [--seed N] [--players N] [--deck 52|36] [--bot greedy|random]
                     [--orden] [--mice] [--northern] [--medals] [--accumulate]
                     [--swap] [--nomenclature] [--save <path>]
    kolkhoz resume <path> [--bot greedy|random]
    kolkhoz inspect <path>
    kolkhoz --help
";

#[derive(Debug)]
pub enum CliError {
    UnknownCommand(String),
    UnknownFlag(String),
    MissingArgument(&'static str),
    InvalidNumber(String),
    InvalidDeck(String),
    InvalidBot(String),
    Io(std::io::Error),
    Snapshot(SnapshotError),
    Game(GameError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::UnknownCommand(cmd) => write!(f, "Unknown command: {cmd}"),
            CliError::UnknownFlag(flag) => write!(f, "Unknown flag: {flag}"),
            CliError::MissingArgument(arg) => write!(f, "Missing argument: {arg}"),
            CliError::InvalidNumber(value) => write!(f, "Invalid number: {value}"),
            CliError::InvalidDeck(value) => {
                write!(f, "Invalid deck: {value}. Valid decks: 52, 36")
            }
            CliError::InvalidBot(value) => {
                write!(f, "Invalid bot: {value}. Valid bots: greedy, random")
            }
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Snapshot(err) => write!(f, "Snapshot error: {err}"),
            CliError::Game(err) => write!(f, "Game error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        CliError::Io(value)
    }
}

impl From<SnapshotError> for CliError {
    fn from(value: SnapshotError) -> Self {
        CliError::Snapshot(value)
    }
}

impl From<GameError> for CliError {
    fn from(value: GameError) -> Self {
        CliError::Game(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum BotKind {
    Greedy,
    Random,
}

impl BotKind {
    fn from_str(s: &str) -> Result<Self, CliError> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(BotKind::Greedy),
            "random" => Ok(BotKind::Random),
            other => Err(CliError::InvalidBot(other.to_string())),
        }
    }

    fn build(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            BotKind::Greedy => Box::new(GreedyStrategy::new()),
            BotKind::Random => Box::new(RandomStrategy::with_seed(seed)),
        }
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let mut args = std::env::args().skip(1);
    let Some(cmd) = args.next() else {
        print!("{USAGE}");
        return Ok(());
    };

    match cmd.as_str() {
        "simulate" => simulate(args),
        "resume" => {
            let path = args
                .next()
                .map(PathBuf::from)
                .ok_or(CliError::MissingArgument("resume <path>"))?;
            let mut bot = BotKind::Greedy;
            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--bot" => {
                        let value = args.next().ok_or(CliError::MissingArgument("--bot"))?;
                        bot = BotKind::from_str(&value)?;
                    }
                    other => return Err(CliError::UnknownFlag(other.to_string())),
                }
            }
            resume(path, bot)
        }
        "inspect" => {
            let path = args
                .next()
                .map(PathBuf::from)
                .ok_or(CliError::MissingArgument("inspect <path>"))?;
            inspect(path)
        }
        "--help" | "help" => {
            print!("{USAGE}");
            Ok(())
        }
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn simulate(mut args: impl Iterator<Item = String>) -> Result<(), CliError> {
    let mut seed: Option<u64> = None;
    let mut players: usize = 4;
    let mut variants = VariantConfig::default();
    let mut bot = BotKind::Greedy;
    let mut save: Option<PathBuf> = None;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--seed" => {
                let value = args.next().ok_or(CliError::MissingArgument("--seed"))?;
                seed = Some(value.parse().map_err(|_| CliError::InvalidNumber(value))?);
            }
            "--players" => {
                let value = args.next().ok_or(CliError::MissingArgument("--players"))?;
                players = value.parse().map_err(|_| CliError::InvalidNumber(value))?;
            }
            "--deck" => {
                let value = args.next().ok_or(CliError::MissingArgument("--deck"))?;
                variants.deck_type = match value.as_str() {
                    "52" => DeckType::Full52,
                    "36" => DeckType::Reduced36,
                    other => return Err(CliError::InvalidDeck(other.to_string())),
                };
            }
            "--bot" => {
                let value = args.next().ok_or(CliError::MissingArgument("--bot"))?;
                bot = BotKind::from_str(&value)?;
            }
            "--save" => {
                let value = args.next().ok_or(CliError::MissingArgument("--save"))?;
                save = Some(PathBuf::from(value));
            }
            "--orden" => variants.orden_nachalniku = true,
            "--mice" => variants.mice_variant = true,
            "--northern" => variants.northern_style = true,
            "--medals" => variants.medals_count = true,
            "--accumulate" => variants.accumulate_unclaimed_jobs = true,
            "--swap" => variants.allow_swap = true,
            "--nomenclature" => variants.nomenclature = true,
            other => return Err(CliError::UnknownFlag(other.to_string())),
        }
    }

    let seed = seed.unwrap_or_else(rand::random);
    let mut state = GameState::with_seed(players, variants, seed);
    let mut strategy = bot.build(seed);
    drive_to_completion(&mut state, strategy.as_mut())?;

    println!("Seed: {seed}");
    print_scores(&state);

    if let Some(path) = save {
        let json = GameSnapshot::capture(&state).to_json()?;
        fs::write(&path, json)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn resume(path: PathBuf, bot: BotKind) -> Result<(), CliError> {
    let json = fs::read_to_string(&path)?;
    let mut state = GameSnapshot::from_json(&json)?.restore()?;
    let mut strategy = bot.build(state.seed());
    drive_to_completion(&mut state, strategy.as_mut())?;
    print_scores(&state);
    Ok(())
}

fn inspect(path: PathBuf) -> Result<(), CliError> {
    let json = fs::read_to_string(&path)?;
    let state = GameSnapshot::from_json(&json)?.restore()?;
    println!("Seed: {}", state.seed());
    println!("Year: {}", state.year());
    println!("Phase: {}", state.phase());
    match state.trump() {
        Some(trump) => println!("Trump: {trump}"),
        None => println!("Trump: none"),
    }
    let scores = state.scores();
    println!("Players:");
    for (player, score) in state.players().iter().zip(&scores) {
        println!("  {} - {} points", player.name, score);
    }
    let exiled: usize = state.exiled().values().map(Vec::len).sum();
    println!("Exiled: {exiled} cards");
    Ok(())
}

fn print_scores(state: &GameState) {
    println!("Final scores:");
    let scores = state.final_scores();
    let mut best: Option<(usize, u32)> = None;
    for (index, (player, score)) in state.players().iter().zip(&scores).enumerate() {
        println!("  {}: {}", player.name, score);
        if best.is_none_or(|(_, b)| *score > b) {
            best = Some((index, *score));
        }
    }
    if let Some((index, _)) = best {
        println!("Winner: {}", state.players()[index].name);
    }
}
