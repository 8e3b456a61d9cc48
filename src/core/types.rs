// Ficheiro: src/core/types.rs
// Descrição: Tipos fundamentais do jogo (peças, lances, conjuntos de índices).

/// Uma peça é um inteiro 0..=15; cada um dos 4 bits baixos é um atributo
/// (alta/baixa, clara/escura, redonda/quadrada, maciça/oca).
pub type Piece = u8;

/// Número de peças distintas e de casas do tabuleiro.
pub const NUM_PIECES: u8 = 16;
pub const NUM_CELLS: u8 = 16;

/// Valor fora de banda: casa vazia.
pub const EMPTY_CELL: u8 = 16;
/// Valor fora de banda: nenhuma peça a colocar. Mesmo inteiro que `EMPTY_CELL`.
pub const NO_PIECE: u8 = 16;

/// Máscara dos 4 atributos
pub const ATTRIBUTE_MASK: u8 = 0b1111;

#[inline(always)]
pub fn is_piece(value: u8) -> bool {
    value < NUM_PIECES
}

/// Índice linear (0..16) para coordenadas (linha, coluna).
#[inline(always)]
pub fn to_2d(index: u8) -> (u8, u8) {
    (index / 4, index % 4)
}

#[inline(always)]
pub fn to_linear(row: u8, col: u8) -> u8 {
    4 * row + col
}

// Struct para representar um lance: a casa onde a peça atual é colocada
// e a peça entregue ao adversário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub position: u8,
    pub next_piece: u8,
}

impl Move {
    /// Lance nulo `(16, 16)`: nada a jogar (posição terminal ou esgotada).
    pub const NULL: Move = Move { position: EMPTY_CELL, next_piece: NO_PIECE };

    pub const fn new(position: u8, next_piece: u8) -> Self {
        Move { position, next_piece }
    }

    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.position == EMPTY_CELL
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "(none)");
        }
        let (row, col) = to_2d(self.position);
        if self.next_piece == NO_PIECE {
            write!(f, "{}{}/-", (b'a' + col) as char, row + 1)
        } else {
            write!(f, "{}{}/{}", (b'a' + col) as char, row + 1, self.next_piece)
        }
    }
}

/// Conjunto de índices 0..=16 como máscara de bits.
/// Serve tanto para peças disponíveis como para casas livres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexSet(u32);

impl IndexSet {
    pub const EMPTY: IndexSet = IndexSet(0);
    /// Os 16 índices 0..=15
    pub const FULL: IndexSet = IndexSet(0xFFFF);

    #[inline(always)]
    pub const fn from_bits(bits: u32) -> Self {
        IndexSet(bits & 0x1FFFF)
    }

    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn single(index: u8) -> Self {
        IndexSet(1 << index)
    }

    #[inline(always)]
    pub fn contains(self, index: u8) -> bool {
        index <= 16 && self.0 & (1 << index) != 0
    }

    /// Insere e devolve `true` se o índice ainda não estava presente.
    #[inline(always)]
    pub fn insert(&mut self, index: u8) -> bool {
        debug_assert!(index <= 16);
        let bit = 1 << index;
        let absent = self.0 & bit == 0;
        self.0 |= bit;
        absent
    }

    /// Remove e devolve `true` se o índice estava presente.
    #[inline(always)]
    pub fn remove(&mut self, index: u8) -> bool {
        if index > 16 {
            return false;
        }
        let bit = 1 << index;
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    #[inline(always)]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn first(self) -> Option<u8> {
        self.iter().next()
    }

    /// Itera em ordem crescente
    #[inline(always)]
    pub fn iter(self) -> IndexSetIter {
        IndexSetIter { bits: self.0 }
    }

    #[inline(always)]
    pub fn complement16(self) -> Self {
        IndexSet(!self.0 & 0xFFFF)
    }
}

impl FromIterator<u8> for IndexSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = IndexSet::EMPTY;
        for index in iter {
            set.insert(index);
        }
        set
    }
}

impl IntoIterator for IndexSet {
    type Item = u8;
    type IntoIter = IndexSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Itera sobre os bits setados (LSB primeiro)
#[derive(Debug, Clone)]
pub struct IndexSetIter {
    bits: u32,
}

impl Iterator for IndexSetIter {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            let index = self.bits.trailing_zeros() as u8;
            self.bits &= self.bits - 1; // Remove o LSB
            Some(index)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for IndexSetIter {}
