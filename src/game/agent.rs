use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::*;
use crate::engine::{TableStats, TranspositionTable};
use crate::error::TableError;
use crate::search::{NegamaxEngine, SearchConfig};

/// Jogador automático. Recebe cópias do estado; nunca o altera.
pub trait Agent: Send {
    /// Peça entregue ao adversário na abertura
    fn choose_first_piece(&mut self, state: &GameState) -> u8;

    fn choose_move(&mut self, state: &GameState) -> Move;

    fn name(&self) -> String;

    /// Métricas da tabela de transposição, se o agente usar uma
    fn table_stats(&self) -> Option<TableStats> {
        None
    }

    /// Persiste o estado aprendido (tabela), se houver
    fn save_table(&self) -> Result<(), TableError> {
        Ok(())
    }
}

fn random_index<R: Rng>(rng: &mut R, set: IndexSet) -> Option<u8> {
    if set.is_empty() {
        return None;
    }
    set.iter().nth(rng.gen_range(0..set.len()))
}

/// Escolhas uniformes entre peças e casas disponíveis
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent { rng: StdRng::from_entropy() }
    }

    /// Sequência reprodutível
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn choose_first_piece(&mut self, state: &GameState) -> u8 {
        random_index(&mut self.rng, state.available_pieces).unwrap_or(NO_PIECE)
    }

    fn choose_move(&mut self, state: &GameState) -> Move {
        let Some(position) = random_index(&mut self.rng, state.available_positions) else {
            return Move::NULL;
        };
        let next_piece = random_index(&mut self.rng, state.available_pieces).unwrap_or(NO_PIECE);
        Move::new(position, next_piece)
    }

    fn name(&self) -> String {
        "Random".to_string()
    }
}

/// Agente de busca: negamax alpha-beta com tabela opcional.
pub struct NegamaxAgent {
    engine: NegamaxEngine,
    rng: StdRng,
}

impl NegamaxAgent {
    pub fn new(config: SearchConfig) -> Self {
        NegamaxAgent { engine: NegamaxEngine::new(config), rng: StdRng::from_entropy() }
    }

    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        NegamaxAgent { engine: NegamaxEngine::new(config), rng: StdRng::seed_from_u64(seed) }
    }

    pub fn with_table(mut self, table: TranspositionTable) -> Self {
        self.engine.attach_table(table);
        self
    }

    pub fn config(&self) -> SearchConfig {
        self.engine.config()
    }

    pub fn engine(&self) -> &NegamaxEngine {
        &self.engine
    }

    pub fn table_hit_rate(&self) -> Option<f64> {
        self.engine.table().map(|t| t.hit_rate())
    }

    pub fn clear_table_stats(&mut self) {
        if let Some(table) = self.engine.table_mut() {
            table.clear_stats();
        }
    }
}

impl Agent for NegamaxAgent {
    fn choose_first_piece(&mut self, state: &GameState) -> u8 {
        random_index(&mut self.rng, state.available_pieces).unwrap_or(NO_PIECE)
    }

    fn choose_move(&mut self, state: &GameState) -> Move {
        self.engine.best_move(state)
    }

    fn name(&self) -> String {
        let config = self.engine.config();
        format!("Negamax-{}-{}", config.depth, config.search_window)
    }

    fn table_stats(&self) -> Option<TableStats> {
        self.engine.table().map(|t| t.stats())
    }

    /// Só tabelas com ficheiro associado são gravadas.
    fn save_table(&self) -> Result<(), TableError> {
        match self.engine.table() {
            Some(table) if table.path().is_some() => table.save(),
            _ => Ok(()),
        }
    }
}
