use fxhash::FxHashMap as HashMap;
use std::path::{Path, PathBuf};

use super::persist::{self, TABLE_EXTENSION};
use crate::core::{Move, PositionKey};
use crate::error::TableError;

/// Magnitude máxima guardada na tabela. Vitórias/derrotas forçadas (±infinito)
/// são gravadas como ±10, que já domina qualquer avaliação finita (≤ 10 linhas).
pub const STORED_SCORE_LIMIT: i32 = 10;

/// Entry da tabela: avaliação da raiz e melhor lance encontrado
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub score: i8,
    pub best_move: Move,
}

/// Contadores de eficácia (monótonos)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    pub hits: u64,
    pub lookups: u64,
}

impl TableStats {
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 { 0.0 } else { self.hits as f64 / self.lookups as f64 }
    }
}

/// Ajusta o score para a faixa persistida
#[inline]
pub fn clamp_score(score: i32) -> i8 {
    score.clamp(-STORED_SCORE_LIMIT, STORED_SCORE_LIMIT) as i8
}

/// Transposition Table com FxHash: chave da posição -> (score, melhor lance).
/// Só recebe resultados de raiz; um único escritor por sessão de busca.
pub struct TranspositionTable {
    name: String,
    path: Option<PathBuf>,
    table: HashMap<PositionKey, TTEntry>,
    hits: u64,
    lookups: u64,
}

impl TranspositionTable {
    /// Tabela só em memória
    pub fn new(name: &str) -> Self {
        TranspositionTable {
            name: name.to_string(),
            path: None,
            table: HashMap::default(),
            hits: 0,
            lookups: 0,
        }
    }

    /// `<dir>/<name>.qtt`
    pub fn table_path<P: AsRef<Path>>(dir: P, name: &str) -> PathBuf {
        dir.as_ref().join(format!("{}.{}", name, TABLE_EXTENSION))
    }

    /// Cria (ou sobrescreve) um ficheiro de tabela vazio.
    pub fn create<P: AsRef<Path>>(dir: P, name: &str) -> Result<Self, TableError> {
        let path = Self::table_path(dir, name);
        persist::write_table(&path, &[])?;
        log::info!("created empty table '{}' at {}", name, path.display());
        let mut table = Self::new(name);
        table.path = Some(path);
        Ok(table)
    }

    /// Carrega uma tabela persistida.
    pub fn open<P: AsRef<Path>>(dir: P, name: &str) -> Result<Self, TableError> {
        let path = Self::table_path(dir, name);
        Self::load_from(&path, name)
    }

    pub fn load_from<P: AsRef<Path>>(path: P, name: &str) -> Result<Self, TableError> {
        let entries = persist::read_table(&path)?;
        let mut table = Self::new(name);
        table.table.reserve(entries.len());
        table.table.extend(entries);
        table.path = Some(path.as_ref().to_path_buf());
        log::info!("loaded table '{}' with {} entries", name, table.len());
        Ok(table)
    }

    /// Tabela ausente ou corrompida: a busca segue sem cache.
    pub fn open_or_disabled<P: AsRef<Path>>(dir: P, name: &str) -> Option<Self> {
        match Self::open(dir, name) {
            Ok(table) => Some(table),
            Err(e) => {
                log::warn!("table '{}' unavailable ({}), searching without cache", name, e);
                None
            }
        }
    }

    /// Busca entrada na TT
    #[inline]
    pub fn lookup(&mut self, key: PositionKey) -> Option<TTEntry> {
        self.lookups += 1;
        let entry = self.table.get(&key).copied();
        if entry.is_some() {
            self.hits += 1;
        }
        entry
    }

    /// Consulta sem afetar as estatísticas
    pub fn peek(&self, key: PositionKey) -> Option<TTEntry> {
        self.table.get(&key).copied()
    }

    /// Insere ou sobrescreve o resultado de uma busca de raiz.
    pub fn record_root(&mut self, key: PositionKey, score: i32, best_move: Move) {
        self.table.insert(key, TTEntry { score: clamp_score(score), best_move });
    }

    /// Persiste no ficheiro de origem da tabela
    pub fn save(&self) -> Result<(), TableError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Err(TableError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "table has no backing file",
            ))),
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let entries: Vec<(PositionKey, TTEntry)> = self.table.iter().map(|(&k, &e)| (k, e)).collect();
        persist::write_table(&path, &entries)?;
        log::info!(
            "saved table '{}' ({} entries) to {}",
            self.name,
            entries.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Associa um ficheiro de destino a uma tabela em memória
    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) {
        self.path = Some(path.as_ref().to_path_buf());
    }

    pub fn stats(&self) -> TableStats {
        TableStats { hits: self.hits, lookups: self.lookups }
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    pub fn clear_stats(&mut self) {
        self.hits = 0;
        self.lookups = 0;
    }

    /// Limpa toda a TT
    pub fn clear(&mut self) {
        self.table.clear();
        self.clear_stats();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
