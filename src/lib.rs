// Quarto - Motor de busca Negamax com poda alpha-beta e tabela de transposição

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod game;
pub mod search;

pub use core::*;
pub use engine::{TTEntry, TableStats, TranspositionTable};
pub use error::{QuartoError, TableError};
pub use search::{NegamaxEngine, SearchConfig, SearchResult, SearchState};
