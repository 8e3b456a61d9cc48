// Ficheiro: src/core/encoding.rs
// Descrição: Codec compacto de posições. 17 campos de 5 bits (16 casas em
// row-major + peça atual) empacotados num u128 de 85 bits.

use super::board::Board;
use super::types::*;
use crate::error::QuartoError;
use std::str::FromStr;

const FIELD_BITS: u32 = 5;
const FIELD_MASK: u128 = 0b11111;
const NUM_FIELDS: u32 = 17;
/// Índice do campo da peça atual (depois das 16 casas)
const CURRENT_FIELD: u32 = 16;
const USED_BITS_MASK: u128 = (1u128 << (FIELD_BITS * NUM_FIELDS)) - 1;

const fn all_empty_key() -> u128 {
    let mut key = 0u128;
    let mut i = 0;
    while i < NUM_FIELDS {
        key |= (EMPTY_CELL as u128) << (FIELD_BITS * i);
        i += 1;
    }
    key
}

/// Chave canónica de uma posição: função pura e posicional de (tabuleiro, peça atual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(u128);

impl PositionKey {
    /// Tabuleiro vazio e nenhuma peça atual
    pub const EMPTY: PositionKey = PositionKey(all_empty_key());

    /// Largura da forma textual (17 campos de 2 dígitos)
    pub const TEXT_WIDTH: usize = 34;

    pub fn encode(board: &Board, current_piece: u8) -> Self {
        let mut key = 0u128;
        for (i, &value) in board.cells().iter().enumerate() {
            key |= ((value as u128) & FIELD_MASK) << (FIELD_BITS * i as u32);
        }
        key |= ((current_piece as u128) & FIELD_MASK) << (FIELD_BITS * CURRENT_FIELD);
        PositionKey(key)
    }

    /// Inverso exato de `encode` para chaves válidas.
    pub fn decode(self) -> (Board, u8) {
        let (cells, current) = self.decode_cells();
        (Board::from_cells_unchecked(cells), current)
    }

    pub(crate) fn decode_cells(self) -> ([u8; 16], u8) {
        let mut cells = [EMPTY_CELL; 16];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = self.field(i as u32);
        }
        (cells, self.current_piece())
    }

    #[inline(always)]
    fn field(self, index: u32) -> u8 {
        ((self.0 >> (FIELD_BITS * index)) & FIELD_MASK) as u8
    }

    #[inline(always)]
    fn with_field(self, index: u32, value: u8) -> Self {
        let shift = FIELD_BITS * index;
        let cleared = self.0 & !(FIELD_MASK << shift);
        PositionKey(cleared | (((value as u128) & FIELD_MASK) << shift))
    }

    /// Conteúdo de uma casa (0..=16)
    #[inline(always)]
    pub fn cell(self, position: u8) -> u8 {
        self.field(position as u32)
    }

    #[inline(always)]
    pub fn current_piece(self) -> u8 {
        self.field(CURRENT_FIELD)
    }

    /// Chave depois de colocar a peça atual em `position` e entregar `next_piece`.
    /// Dois splices de campo fixo; não materializa o tabuleiro.
    #[inline(always)]
    pub fn successor(self, position: u8, next_piece: u8) -> Self {
        let current = self.current_piece();
        self.with_field(position as u32, current)
            .with_field(CURRENT_FIELD, next_piece)
    }

    #[inline(always)]
    pub fn raw(self) -> u128 {
        self.0
    }

    /// Aceita apenas chaves com 17 campos em 0..=16 e bits altos a zero.
    pub fn from_raw(raw: u128) -> Option<Self> {
        if raw & !USED_BITS_MASK != 0 {
            return None;
        }
        let key = PositionKey(raw);
        if (0..NUM_FIELDS).all(|i| key.field(i) <= EMPTY_CELL) {
            Some(key)
        } else {
            None
        }
    }
}

impl Default for PositionKey {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// `encode(board, currentPiece)`
#[inline]
pub fn encode(board: &Board, current_piece: u8) -> PositionKey {
    PositionKey::encode(board, current_piece)
}

/// `decode(key)`
#[inline]
pub fn decode(key: PositionKey) -> (Board, u8) {
    key.decode()
}

/// `successorKey(key, position, nextPiece)`
#[inline]
pub fn successor_key(key: PositionKey, position: u8, next_piece: u8) -> PositionKey {
    key.successor(position, next_piece)
}

// Forma textual: 17 códigos de dois dígitos, casas em row-major e peça atual no fim.
impl std::fmt::Display for PositionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..NUM_FIELDS {
            write!(f, "{:02}", self.field(i))?;
        }
        Ok(())
    }
}

impl FromStr for PositionKey {
    type Err = QuartoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != Self::TEXT_WIDTH || !bytes.iter().all(|b| b.is_ascii_digit()) {
            return Err(QuartoError::InvalidKey(s.to_string()));
        }
        let mut key = 0u128;
        for (i, pair) in bytes.chunks_exact(2).enumerate() {
            let value = (pair[0] - b'0') * 10 + (pair[1] - b'0');
            if value > EMPTY_CELL {
                return Err(QuartoError::InvalidKey(s.to_string()));
            }
            key |= (value as u128) << (FIELD_BITS * i as u32);
        }
        Ok(PositionKey(key))
    }
}
