// Ficheiro: src/game/mod.rs
// Descrição: Condução de partidas entre dois agentes, com validação de
// lances, tentativas, estatísticas de tempo e séries (sequenciais/paralelas).

pub mod agent;
pub mod stats;

pub use agent::*;
pub use stats::*;

use rayon::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

use crate::core::*;

/// Tentativas por jogada antes da desistência
pub const DEFAULT_RETRIES: u8 = 2;

/// Cabeçalho do CSV das séries
pub const SERIES_CSV_HEADER: &str =
    "result,player1cumulativeTime,player2cumulativeTime,player1numMoves,player2numMoves";

/// Uma partida entre dois agentes. O jogador 1 entrega a primeira peça,
/// o jogador 2 coloca-a; depois alternam.
pub struct Match {
    player_one: Box<dyn Agent>,
    player_two: Box<dyn Agent>,
    state: GameState,
    is_player_one_turn: bool,
    retries: u8,
    log_stats: bool,
    stats: GameStats,
}

impl Match {
    pub fn new(player_one: Box<dyn Agent>, player_two: Box<dyn Agent>) -> Self {
        Match {
            player_one,
            player_two,
            state: GameState::new(),
            is_player_one_turn: true,
            retries: DEFAULT_RETRIES,
            log_stats: false,
            stats: GameStats::new(),
        }
    }

    /// Número máximo de tentativas por jogada (mínimo 1)
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries.max(1);
        self
    }

    pub fn with_stats(mut self, log_stats: bool) -> Self {
        self.log_stats = log_stats;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn player_one(&self) -> &dyn Agent {
        self.player_one.as_ref()
    }

    pub fn player_two(&self) -> &dyn Agent {
        self.player_two.as_ref()
    }

    pub fn reset(&mut self) {
        self.state = GameState::new();
        self.is_player_one_turn = true;
        self.stats.reset();
    }

    fn mover_name(&self) -> String {
        if self.is_player_one_turn { self.player_one.name() } else { self.player_two.name() }
    }

    fn mover(&mut self) -> &mut dyn Agent {
        if self.is_player_one_turn { self.player_one.as_mut() } else { self.player_two.as_mut() }
    }

    /// Abertura: o jogador da vez escolhe a peça para o adversário.
    fn try_first_piece(&mut self) -> bool {
        for attempt in 1..=self.retries {
            let view = self.state;
            let piece = self.mover().choose_first_piece(&view);
            match self.state.choose_first_piece(piece) {
                Ok(()) => {
                    log::debug!("{} hands over piece {}", self.mover_name(), piece);
                    return true;
                }
                Err(e) => log::warn!(
                    "{} chose an invalid first piece (attempt {}/{}): {}",
                    self.mover_name(),
                    attempt,
                    self.retries,
                    e
                ),
            }
        }
        false
    }

    /// Pede um lance ao jogador da vez; lances inválidos são repetidos
    /// até ao limite de tentativas. O estado só muda com um lance válido.
    fn try_make_move(&mut self) -> bool {
        for attempt in 1..=self.retries {
            let view = self.state;
            let start = Instant::now();
            let mv = self.mover().choose_move(&view);
            let elapsed_ms = start.elapsed().as_millis();

            match self.state.apply_move(mv) {
                Ok(()) => {
                    if self.log_stats {
                        self.stats.record_move(self.is_player_one_turn, elapsed_ms);
                    }
                    log::debug!("{} plays {} ({} ms)", self.mover_name(), mv, elapsed_ms);
                    return true;
                }
                Err(e) => log::warn!(
                    "{} played invalid move {} (attempt {}/{}): {}",
                    self.mover_name(),
                    mv,
                    attempt,
                    self.retries,
                    e
                ),
            }
        }
        false
    }

    /// Joga uma partida completa a partir do início.
    pub fn run(&mut self) -> GameResult {
        self.reset();

        if !self.try_first_piece() {
            return self.finish(GameResult::forfeit(true));
        }
        self.is_player_one_turn = false;

        // 15 colocações com entrega; a 16ª não tem peça a entregar
        for _ in 1..NUM_CELLS {
            if !self.try_make_move() {
                return self.finish(GameResult::forfeit(self.is_player_one_turn));
            }
            if self.state.is_game_over() {
                return self.finish(GameResult::won(self.is_player_one_turn));
            }
            self.is_player_one_turn = !self.is_player_one_turn;
        }

        match self.state.place_last_piece() {
            Ok(position) => log::debug!("last piece placed at {}", position),
            Err(e) => {
                log::warn!("could not place last piece: {}", e);
                return self.finish(GameResult::Draw);
            }
        }
        if self.state.is_game_over() {
            self.finish(GameResult::won(self.is_player_one_turn))
        } else {
            self.finish(GameResult::Draw)
        }
    }

    fn finish(&self, result: GameResult) -> GameResult {
        log::info!(
            "{} vs {}: result {} ({})",
            self.player_one.name(),
            self.player_two.name(),
            result,
            self.stats
        );
        log::debug!("final board:\n{}", self.state.board);
        result
    }

    /// Joga `games` partidas e escreve uma linha CSV por partida em `sink`.
    pub fn run_series<W: Write>(&mut self, games: u32, mut sink: W) -> io::Result<SeriesSummary> {
        self.log_stats = true;
        writeln!(sink, "{}", SERIES_CSV_HEADER)?;

        let mut summary = SeriesSummary::default();
        for _ in 0..games {
            let result = self.run();
            writeln!(sink, "{}", self.stats.csv_line(result))?;
            summary.record(result, &self.stats);
        }
        sink.flush()?;

        log::info!("{} vs {}: {}", self.player_one.name(), self.player_two.name(), summary);
        Ok(summary)
    }

    /// Partidas independentes no pool do rayon. Cada partida constrói os
    /// seus próprios agentes via `factory`; nada é partilhado entre threads.
    /// As linhas CSV saem na ordem das partidas.
    pub fn run_series_parallel<F, W>(games: u32, retries: u8, factory: F, mut sink: W) -> io::Result<SeriesSummary>
    where
        F: Fn(u32) -> (Box<dyn Agent>, Box<dyn Agent>) + Sync,
        W: Write,
    {
        let records: Vec<(GameResult, GameStats)> = (0..games)
            .into_par_iter()
            .map(|game| {
                let (player_one, player_two) = factory(game);
                let mut game_match = Match::new(player_one, player_two)
                    .with_retries(retries)
                    .with_stats(true);
                let result = game_match.run();
                (result, game_match.stats)
            })
            .collect();

        let summary = records
            .par_iter()
            .map(|(result, stats)| SeriesSummary::from_game(*result, stats))
            .reduce(SeriesSummary::default, SeriesSummary::merge);

        writeln!(sink, "{}", SERIES_CSV_HEADER)?;
        for (result, stats) in &records {
            writeln!(sink, "{}", stats.csv_line(*result))?;
        }
        sink.flush()?;

        log::info!("parallel series: {}", summary);
        Ok(summary)
    }
}
