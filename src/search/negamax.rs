use crate::core::*;
use crate::engine::{TableStats, TranspositionTable};
use crate::search::evaluation::evaluate;
use crate::search::move_ordering::candidate_moves;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

/// "Infinito" da busca: derrota/vitória forçada. Maior que qualquer avaliação finita.
pub const INFINITY: i32 = 1000;
pub const MIN_EVAL: i32 = -INFINITY;
/// Janela da raiz, estritamente dentro de ±INFINITY: uma vitória forçada
/// excede beta e corta logo no primeiro lance vencedor.
pub const ROOT_BOUND: i32 = 500;

/// Parâmetros da busca: profundidade e janela (máximo de irmãos explorados por nó).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u8,
    pub search_window: usize,
}

impl SearchConfig {
    pub fn new(depth: u8, search_window: usize) -> Self {
        SearchConfig { depth, search_window }
    }

    /// Sem limite de janela: alpha-beta completo até `depth`
    pub fn full_width(depth: u8) -> Self {
        SearchConfig { depth, search_window: usize::MAX }
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_search_window(mut self, search_window: usize) -> Self {
        self.search_window = search_window;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { depth: 3, search_window: 256 }
    }
}

/// Resultado da busca
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Move,
    pub nodes_searched: u64,
    pub time_elapsed: Duration,
    pub table_stats: Option<TableStats>,
}

/// Estado de rascunho da busca: chave + conjuntos disponíveis.
/// Mutado no lugar a cada lance simulado e restaurado no backtrack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    pub key: PositionKey,
    pub available_pieces: IndexSet,
    pub available_positions: IndexSet,
}

impl SearchState {
    pub fn new(key: PositionKey, available_pieces: IndexSet, available_positions: IndexSet) -> Self {
        SearchState { key, available_pieces, available_positions }
    }
}

impl From<&GameState> for SearchState {
    fn from(state: &GameState) -> Self {
        SearchState {
            key: state.key(),
            available_pieces: state.available_pieces,
            available_positions: state.available_positions,
        }
    }
}

/// Lance simulado sobre o estado de rascunho. O `Drop` desfaz o lance,
/// então qualquer saída (poda, retorno antecipado, panic) restaura o pai.
struct SimulatedMove<'a> {
    state: &'a mut SearchState,
    mv: Move,
    parent_key: PositionKey,
    removed_piece: bool,
}

impl<'a> SimulatedMove<'a> {
    #[inline(always)]
    fn make(state: &'a mut SearchState, mv: Move) -> Self {
        let parent_key = state.key;
        state.key = parent_key.successor(mv.position, mv.next_piece);
        state.available_positions.remove(mv.position);
        // NO_PIECE nunca está no conjunto; nada a remover nem a repor
        let removed_piece = state.available_pieces.remove(mv.next_piece);
        SimulatedMove { state, mv, parent_key, removed_piece }
    }
}

impl Drop for SimulatedMove<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        self.state.key = self.parent_key;
        self.state.available_positions.insert(self.mv.position);
        if self.removed_piece {
            self.state.available_pieces.insert(self.mv.next_piece);
        }
    }
}

impl Deref for SimulatedMove<'_> {
    type Target = SearchState;

    fn deref(&self) -> &SearchState {
        &*self.state
    }
}

impl DerefMut for SimulatedMove<'_> {
    fn deref_mut(&mut self) -> &mut SearchState {
        &mut *self.state
    }
}

/// Motor Negamax com poda alpha-beta, janela de busca e TT opcional
pub struct NegamaxEngine {
    config: SearchConfig,
    table: Option<TranspositionTable>,
    nodes_searched: u64,
}

impl NegamaxEngine {
    pub fn new(config: SearchConfig) -> Self {
        NegamaxEngine { config, table: None, nodes_searched: 0 }
    }

    pub fn with_table(config: SearchConfig, table: TranspositionTable) -> Self {
        NegamaxEngine { config, table: Some(table), nodes_searched: 0 }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    pub fn attach_table(&mut self, table: TranspositionTable) {
        self.table = Some(table);
    }

    pub fn detach_table(&mut self) -> Option<TranspositionTable> {
        self.table.take()
    }

    pub fn table(&self) -> Option<&TranspositionTable> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut TranspositionTable> {
        self.table.as_mut()
    }

    /// Busca a partir de um estado de jogo; o estado do chamador não é tocado.
    pub fn search(&mut self, state: &GameState) -> SearchResult {
        let mut scratch = SearchState::from(state);
        self.search_state(&mut scratch)
    }

    /// Busca sobre um estado de rascunho; devolvido intacto ao terminar.
    pub fn search_state(&mut self, scratch: &mut SearchState) -> SearchResult {
        self.nodes_searched = 0;
        let start_time = Instant::now();

        let (score, best_move) = self.alpha_beta(scratch, self.config.depth, -ROOT_BOUND, ROOT_BOUND);

        let result = SearchResult {
            score,
            best_move,
            nodes_searched: self.nodes_searched,
            time_elapsed: start_time.elapsed(),
            table_stats: self.table.as_ref().map(|t| t.stats()),
        };

        log::debug!(
            "search depth {} window {}: move {} score {} nodes {} time {}ms{}",
            self.config.depth,
            self.config.search_window,
            result.best_move,
            result.score,
            result.nodes_searched,
            result.time_elapsed.as_millis(),
            match result.table_stats {
                Some(stats) => format!(" hit rate {:.2}%", stats.hit_rate() * 100.0),
                None => String::new(),
            }
        );

        result
    }

    pub fn best_move(&mut self, state: &GameState) -> Move {
        self.search(state).best_move
    }

    /// Negamax: o score é sempre do ponto de vista de quem vai jogar.
    fn alpha_beta(&mut self, state: &mut SearchState, depth: u8, mut alpha: i32, beta: i32) -> (i32, Move) {
        self.nodes_searched += 1;

        // O adversário completou uma linha no lance anterior
        if is_game_over_key(state.key) {
            return (MIN_EVAL, Move::NULL);
        }
        if depth == 0 || state.available_positions.is_empty() {
            return (evaluate(state.key), Move::NULL);
        }

        // ========== TT PROBE ==========
        if let Some(table) = self.table.as_mut() {
            if let Some(entry) = table.lookup(state.key) {
                return (entry.score as i32, entry.best_move);
            }
        }

        let is_root = depth == self.config.depth;
        let mut max_score = MIN_EVAL;
        let mut best_move = Move::NULL;

        let moves = candidate_moves(state.available_pieces, state.available_positions, self.config.search_window);
        for mv in moves {
            let score = {
                let mut child = SimulatedMove::make(state, mv);
                -self.alpha_beta(&mut child, depth - 1, -beta, -alpha).0
            };

            if score >= max_score {
                max_score = score;
                best_move = mv;
            }
            alpha = alpha.max(max_score);

            if alpha > beta {
                if is_root {
                    self.record_root(state.key, max_score, best_move);
                }
                return (alpha, best_move);
            }
        }

        if is_root {
            self.record_root(state.key, max_score, best_move);
        }
        (max_score, best_move)
    }

    /// ========== TT STORE ========== (só na raiz)
    #[inline]
    fn record_root(&mut self, key: PositionKey, score: i32, best_move: Move) {
        if let Some(table) = self.table.as_mut() {
            table.record_root(key, score, best_move);
        }
    }
}
