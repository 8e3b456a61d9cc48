// Tipos de erro da biblioteca

use std::io;

/// Erros de leitura/escrita da tabela de transposição persistida
#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid magic or version")]
    MagicOrVersion,
    #[error("malformed table file: {0}")]
    Malformed(&'static str),
    #[error("checksum mismatch")]
    Checksum,
    #[error("invalid record at index {index}")]
    InvalidRecord { index: usize },
}

/// Erros de validação de posições e lances (camada externa ao núcleo de busca)
#[derive(thiserror::Error, Debug)]
pub enum QuartoError {
    #[error("invalid piece value: {0}")]
    InvalidPiece(u8),
    #[error("invalid position: {0}")]
    InvalidPosition(u8),
    #[error("piece {0} has already been placed or is the piece being placed now")]
    PieceUnavailable(u8),
    #[error("cell {0} is unavailable")]
    CellOccupied(u8),
    #[error("invalid position key: {0}")]
    InvalidKey(String),
    #[error("inconsistent game state: {0}")]
    InconsistentState(&'static str),
    #[error(transparent)]
    Table(#[from] TableError),
}
