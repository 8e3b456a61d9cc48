// Quarto - driver de linha de comando: partidas, busca única e manutenção de tabelas
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use quarto::config;
use quarto::game::{Agent, Match, NegamaxAgent, RandomAgent, DEFAULT_RETRIES};
use quarto::{GameState, NegamaxEngine, PositionKey, SearchConfig, TranspositionTable};

#[derive(Parser, Debug)]
#[command(name = "quarto", author, version, about = "Quarto engine: negamax alpha-beta search")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a series of games between two agents
    Play {
        /// Player one: `random` or `negamax[:DEPTH[:WINDOW]]`
        #[arg(long, default_value = "negamax:3:32")]
        p1: String,

        /// Player two: `random` or `negamax[:DEPTH[:WINDOW]]`
        #[arg(long, default_value = "random")]
        p2: String,

        /// Number of games
        #[arg(short = 'n', long, default_value_t = 1)]
        games: u32,

        /// Attempts per move before forfeiting
        #[arg(long, default_value_t = DEFAULT_RETRIES)]
        retries: u8,

        /// Play the games on the rayon pool (no tables are shared)
        #[arg(long)]
        parallel: bool,

        /// Worker threads (default: QUARTO_THREADS or CPU count)
        #[arg(long)]
        threads: Option<usize>,

        /// Table name for negamax agents (sequential mode only)
        #[arg(long)]
        table: Option<String>,

        /// CSV log destination (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search a single position given as a 34-digit key
    Search {
        key: String,

        #[arg(long, default_value_t = 3)]
        depth: u8,

        #[arg(long, default_value_t = 256)]
        window: usize,

        /// Use (and update) a persisted table
        #[arg(long)]
        table: Option<String>,
    },
    /// Persisted table maintenance
    Table {
        #[command(subcommand)]
        action: TableAction,
    },
}

#[derive(Subcommand, Debug)]
enum TableAction {
    /// Create an empty table file
    Create { name: String },
    /// Show table size
    Info { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayerSpec {
    Random,
    Negamax(SearchConfig),
}

fn parse_player(spec: &str) -> Result<PlayerSpec> {
    let mut parts = spec.split(':');
    match parts.next() {
        Some("random") if parts.clone().next().is_none() => Ok(PlayerSpec::Random),
        Some("negamax") => {
            let mut config = SearchConfig::default();
            if let Some(depth) = parts.next() {
                config.depth = depth.parse().with_context(|| format!("invalid depth in '{}'", spec))?;
            }
            if let Some(window) = parts.next() {
                config.search_window = window.parse().with_context(|| format!("invalid window in '{}'", spec))?;
            }
            if parts.next().is_some() {
                bail!("too many fields in player spec '{}'", spec);
            }
            Ok(PlayerSpec::Negamax(config))
        }
        _ => bail!("unknown player '{}' (expected random or negamax[:DEPTH[:WINDOW]])", spec),
    }
}

fn build_agent(spec: PlayerSpec, table: Option<TranspositionTable>) -> Box<dyn Agent> {
    match spec {
        PlayerSpec::Random => Box::new(RandomAgent::new()),
        PlayerSpec::Negamax(config) => {
            let agent = NegamaxAgent::new(config);
            match table {
                Some(table) => Box::new(agent.with_table(table)),
                None => Box::new(agent),
            }
        }
    }
}

/// Abre a tabela pedida; se não existir, começa uma nova no mesmo caminho.
fn load_table(name: &str) -> TranspositionTable {
    let dir = config::tables_dir();
    TranspositionTable::open_or_disabled(&dir, name).unwrap_or_else(|| {
        let mut table = TranspositionTable::new(name);
        table.set_path(TranspositionTable::table_path(&dir, name));
        table
    })
}

fn csv_sink(output: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    })
}

#[allow(clippy::too_many_arguments)]
fn run_play(
    p1: &str,
    p2: &str,
    games: u32,
    retries: u8,
    parallel: bool,
    threads: Option<usize>,
    table: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let p1 = parse_player(p1)?;
    let p2 = parse_player(p2)?;
    let sink = csv_sink(output.as_ref())?;

    if parallel {
        if table.is_some() {
            log::warn!("--table is ignored in parallel mode");
        }
        config::init_rayon_threads_lenient(threads);
        let summary = Match::run_series_parallel(games, retries, |_| (build_agent(p1, None), build_agent(p2, None)), sink)?;
        eprintln!("{}", summary);
        return Ok(());
    }

    // A mesma tabela não pode servir aos dois jogadores; só o jogador 1 a usa
    let p1_table = table.as_deref().map(load_table);
    let mut game = Match::new(build_agent(p1, p1_table), build_agent(p2, None)).with_retries(retries);
    let summary = game.run_series(games, sink)?;
    eprintln!("{}", summary);

    for player in [game.player_one(), game.player_two()] {
        if let Some(stats) = player.table_stats() {
            eprintln!("{} table hit rate: {:.2}% ({} lookups)", player.name(), stats.hit_rate() * 100.0, stats.lookups);
        }
        player.save_table().with_context(|| format!("saving table of {}", player.name()))?;
    }
    Ok(())
}

fn run_search(key: &str, depth: u8, window: usize, table: Option<String>) -> Result<()> {
    let key: PositionKey = key.parse()?;
    let state = GameState::from_key(key)?;
    let config = SearchConfig::new(depth, window);

    let mut engine = NegamaxEngine::new(config);
    if let Some(name) = table.as_deref() {
        engine.attach_table(load_table(name));
    }

    println!("{}", state.board);
    let result = engine.search(&state);
    println!("best move: {}", result.best_move);
    println!("score: {}", result.score);
    println!("nodes: {}", result.nodes_searched);
    println!("time: {} ms", result.time_elapsed.as_millis());
    if let Some(stats) = result.table_stats {
        println!("table hit rate: {:.2}%", stats.hit_rate() * 100.0);
    }

    if let Some(table) = engine.table() {
        table.save()?;
    }
    Ok(())
}

fn run_table(action: TableAction) -> Result<()> {
    let dir = config::tables_dir();
    match action {
        TableAction::Create { name } => {
            let table = TranspositionTable::create(&dir, &name)?;
            if let Some(path) = table.path() {
                println!("created {}", path.display());
            }
        }
        TableAction::Info { name } => {
            let table = TranspositionTable::open(&dir, &name)?;
            println!("{}: {} entries", table.name(), table.len());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();

    match args.command {
        Command::Play { p1, p2, games, retries, parallel, threads, table, output } => {
            run_play(&p1, &p2, games, retries, parallel, threads, table, output)
        }
        Command::Search { key, depth, window, table } => run_search(&key, depth, window, table),
        Command::Table { action } => run_table(action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player_specs() {
        assert_eq!(parse_player("random").unwrap(), PlayerSpec::Random);
        assert_eq!(parse_player("negamax").unwrap(), PlayerSpec::Negamax(SearchConfig::default()));
        assert_eq!(parse_player("negamax:4").unwrap(), PlayerSpec::Negamax(SearchConfig::new(4, 256)));
        assert_eq!(parse_player("negamax:3:32").unwrap(), PlayerSpec::Negamax(SearchConfig::new(3, 32)));
        assert!(parse_player("negamax:x").is_err());
        assert!(parse_player("negamax:1:2:3").is_err());
        assert!(parse_player("random:1").is_err());
        assert!(parse_player("human").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from(["quarto", "play", "--p1", "random", "-n", "5", "--parallel"]).unwrap();
        assert!(matches!(args.command, Command::Play { games: 5, parallel: true, .. }));
        let args = Args::try_parse_from(["quarto", "-d", "table", "create", "main"]).unwrap();
        assert!(args.debug);
    }
}
