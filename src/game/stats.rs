use std::fmt;

/// Resultado de uma partida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    PlayerOneWon,
    PlayerTwoWon,
    Draw,
    /// Jogador 1 esgotou as tentativas com lances inválidos
    PlayerOneInvalid,
    PlayerTwoInvalid,
}

impl GameResult {
    pub fn won(player_one: bool) -> Self {
        if player_one { GameResult::PlayerOneWon } else { GameResult::PlayerTwoWon }
    }

    pub fn forfeit(player_one: bool) -> Self {
        if player_one { GameResult::PlayerOneInvalid } else { GameResult::PlayerTwoInvalid }
    }
}

// Código numérico usado no CSV das séries
impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            GameResult::PlayerOneWon => "1",
            GameResult::PlayerTwoWon => "2",
            GameResult::Draw => "0",
            GameResult::PlayerOneInvalid => "-1",
            GameResult::PlayerTwoInvalid => "-2",
        };
        f.write_str(code)
    }
}

/// Tempo acumulado (ms) e número de lances de cada jogador numa partida
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub p1_cumulative_ms: u128,
    pub p2_cumulative_ms: u128,
    pub p1_num_moves: u8,
    pub p2_num_moves: u8,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_move(&mut self, player_one: bool, elapsed_ms: u128) {
        if player_one {
            self.p1_cumulative_ms += elapsed_ms;
            self.p1_num_moves += 1;
        } else {
            self.p2_cumulative_ms += elapsed_ms;
            self.p2_num_moves += 1;
        }
    }

    /// Linha CSV: `result,p1 ms,p2 ms,p1 lances,p2 lances`
    pub fn csv_line(&self, result: GameResult) -> String {
        format!(
            "{},{},{},{},{}",
            result, self.p1_cumulative_ms, self.p2_cumulative_ms, self.p1_num_moves, self.p2_num_moves
        )
    }
}

impl fmt::Display for GameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player 1: {} ms in {} moves, player 2: {} ms in {} moves",
            self.p1_cumulative_ms, self.p1_num_moves, self.p2_cumulative_ms, self.p2_num_moves
        )
    }
}

/// Totais de uma série de partidas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesSummary {
    pub games: u32,
    pub player_one_wins: u32,
    pub player_two_wins: u32,
    pub draws: u32,
    pub player_one_forfeits: u32,
    pub player_two_forfeits: u32,
    pub p1_total_ms: u128,
    pub p2_total_ms: u128,
}

impl SeriesSummary {
    /// Resumo de uma única partida
    pub fn from_game(result: GameResult, stats: &GameStats) -> Self {
        let mut summary = SeriesSummary::default();
        summary.record(result, stats);
        summary
    }

    pub fn record(&mut self, result: GameResult, stats: &GameStats) {
        self.games += 1;
        match result {
            GameResult::PlayerOneWon => self.player_one_wins += 1,
            GameResult::PlayerTwoWon => self.player_two_wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::PlayerOneInvalid => self.player_one_forfeits += 1,
            GameResult::PlayerTwoInvalid => self.player_two_forfeits += 1,
        }
        self.p1_total_ms += stats.p1_cumulative_ms;
        self.p2_total_ms += stats.p2_cumulative_ms;
    }

    /// Junta dois resumos (redução das séries paralelas)
    pub fn merge(mut self, other: SeriesSummary) -> SeriesSummary {
        self.games += other.games;
        self.player_one_wins += other.player_one_wins;
        self.player_two_wins += other.player_two_wins;
        self.draws += other.draws;
        self.player_one_forfeits += other.player_one_forfeits;
        self.player_two_forfeits += other.player_two_forfeits;
        self.p1_total_ms += other.p1_total_ms;
        self.p2_total_ms += other.p2_total_ms;
        self
    }
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: P1 {} wins, P2 {} wins, {} draws, forfeits {}/{}",
            self.games,
            self.player_one_wins,
            self.player_two_wins,
            self.draws,
            self.player_one_forfeits,
            self.player_two_forfeits
        )
    }
}
