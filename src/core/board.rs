// Ficheiro: src/core/board.rs
// Descrição: Tabuleiro 4x4 e estado de jogo (peça atual + conjuntos disponíveis).

use super::encoding::PositionKey;
use super::rules;
use super::types::*;
use crate::error::QuartoError;

// Tabuleiro em ordem row-major; cada casa guarda uma peça ou EMPTY_CELL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [u8; 16],
}

impl Board {
    pub const EMPTY: Board = Board { cells: [EMPTY_CELL; 16] };

    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Cria um tabuleiro validando valores (0..=16) e peças repetidas.
    pub fn from_cells(cells: [u8; 16]) -> Result<Self, QuartoError> {
        let mut seen = IndexSet::EMPTY;
        for &value in &cells {
            if value > EMPTY_CELL {
                return Err(QuartoError::InvalidPiece(value));
            }
            if value != EMPTY_CELL && !seen.insert(value) {
                return Err(QuartoError::InconsistentState("piece placed twice"));
            }
        }
        Ok(Board { cells })
    }

    pub fn from_rows(rows: [[u8; 4]; 4]) -> Result<Self, QuartoError> {
        let mut cells = [EMPTY_CELL; 16];
        for (row, values) in rows.iter().enumerate() {
            cells[row * 4..row * 4 + 4].copy_from_slice(values);
        }
        Self::from_cells(cells)
    }

    /// Construção sem validação, usada pelo codec (campos já limitados a 5 bits).
    pub(crate) fn from_cells_unchecked(cells: [u8; 16]) -> Self {
        Board { cells }
    }

    #[inline(always)]
    pub fn cells(&self) -> &[u8; 16] {
        &self.cells
    }

    #[inline(always)]
    pub fn get(&self, position: u8) -> u8 {
        self.cells[position as usize]
    }

    #[inline(always)]
    pub fn get_rc(&self, row: u8, col: u8) -> u8 {
        self.get(to_linear(row, col))
    }

    #[inline(always)]
    pub fn is_empty_cell(&self, position: u8) -> bool {
        self.get(position) == EMPTY_CELL
    }

    /// Coloca uma peça (ou esvazia com EMPTY_CELL). Não valida.
    #[inline(always)]
    pub fn place(&mut self, position: u8, piece: u8) {
        self.cells[position as usize] = piece;
    }

    #[inline(always)]
    pub fn clear(&mut self, position: u8) {
        self.cells[position as usize] = EMPTY_CELL;
    }

    /// Casas livres
    pub fn open_cells(&self) -> IndexSet {
        (0..NUM_CELLS).filter(|&p| self.is_empty_cell(p)).collect()
    }

    /// Peças já colocadas no tabuleiro
    pub fn placed_pieces(&self) -> IndexSet {
        self.cells.iter().copied().filter(|&v| v != EMPTY_CELL).collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != EMPTY_CELL).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == NUM_CELLS as usize
    }

    pub fn rows(&self) -> [[u8; 4]; 4] {
        let mut rows = [[EMPTY_CELL; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&self.cells[i * 4..i * 4 + 4]);
        }
        rows
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|&v| if v == EMPTY_CELL { "..".to_string() } else { format!("{:02}", v) })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Estado completo de uma posição: tabuleiro, peça a colocar e conjuntos disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_piece: u8,
    pub available_pieces: IndexSet,
    pub available_positions: IndexSet,
}

impl GameState {
    /// Tabuleiro vazio, nenhuma peça escolhida ainda
    pub fn new() -> Self {
        GameState {
            board: Board::EMPTY,
            current_piece: NO_PIECE,
            available_pieces: IndexSet::FULL,
            available_positions: IndexSet::FULL,
        }
    }

    /// Reconstrói o estado a partir de uma chave; os conjuntos disponíveis
    /// são o complemento das peças colocadas + peça atual.
    pub fn from_key(key: PositionKey) -> Result<Self, QuartoError> {
        let (cells, current_piece) = key.decode_cells();
        let board = Board::from_cells(cells)?;
        let mut used = board.placed_pieces();
        if current_piece != NO_PIECE && !used.insert(current_piece) {
            return Err(QuartoError::InconsistentState("current piece is already on the board"));
        }
        Ok(GameState {
            board,
            current_piece,
            available_pieces: used.complement16(),
            available_positions: board.open_cells(),
        })
    }

    #[inline]
    pub fn key(&self) -> PositionKey {
        PositionKey::encode(&self.board, self.current_piece)
    }

    /// Verifica as invariantes de partição entre tabuleiro e conjuntos.
    pub fn validate(&self) -> Result<(), QuartoError> {
        if self.current_piece > NO_PIECE {
            return Err(QuartoError::InvalidPiece(self.current_piece));
        }
        if self.available_positions.bits() & !0xFFFF != 0 || self.available_pieces.bits() & !0xFFFF != 0 {
            return Err(QuartoError::InconsistentState("sentinel stored in an available set"));
        }
        if self.available_positions != self.board.open_cells() {
            return Err(QuartoError::InconsistentState("available positions do not match open cells"));
        }
        let mut used = self.board.placed_pieces();
        if self.current_piece != NO_PIECE && !used.insert(self.current_piece) {
            return Err(QuartoError::InconsistentState("current piece is already on the board"));
        }
        if used.bits() & self.available_pieces.bits() != 0 || (used.bits() | self.available_pieces.bits()) != 0xFFFF {
            return Err(QuartoError::InconsistentState("available pieces do not partition the piece set"));
        }
        Ok(())
    }

    /// Primeira entrega: escolhe a peça que o adversário vai colocar.
    pub fn choose_first_piece(&mut self, piece: u8) -> Result<(), QuartoError> {
        if !is_piece(piece) {
            return Err(QuartoError::InvalidPiece(piece));
        }
        if self.current_piece != NO_PIECE {
            return Err(QuartoError::InconsistentState("first piece already chosen"));
        }
        if !self.available_pieces.remove(piece) {
            return Err(QuartoError::PieceUnavailable(piece));
        }
        self.current_piece = piece;
        Ok(())
    }

    /// Verifica se um lance é jogável a partir deste estado.
    pub fn check_move(&self, mv: Move) -> Result<(), QuartoError> {
        if self.current_piece == NO_PIECE {
            return Err(QuartoError::InconsistentState("no piece to place"));
        }
        if mv.position >= NUM_CELLS {
            return Err(QuartoError::InvalidPosition(mv.position));
        }
        if !self.available_positions.contains(mv.position) {
            return Err(QuartoError::CellOccupied(mv.position));
        }
        if mv.next_piece == NO_PIECE {
            // Só é possível não entregar peça quando não resta nenhuma
            if !self.available_pieces.is_empty() {
                return Err(QuartoError::PieceUnavailable(mv.next_piece));
            }
        } else if !is_piece(mv.next_piece) {
            return Err(QuartoError::InvalidPiece(mv.next_piece));
        } else if !self.available_pieces.contains(mv.next_piece) {
            return Err(QuartoError::PieceUnavailable(mv.next_piece));
        }
        Ok(())
    }

    /// Valida e aplica um lance; o estado só muda se o lance for válido.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), QuartoError> {
        self.check_move(mv)?;
        self.board.place(mv.position, self.current_piece);
        self.available_positions.remove(mv.position);
        self.available_pieces.remove(mv.next_piece);
        self.current_piece = mv.next_piece;
        Ok(())
    }

    /// Coloca a última peça na última casa livre, sem entrega.
    pub fn place_last_piece(&mut self) -> Result<u8, QuartoError> {
        let position = self
            .available_positions
            .first()
            .ok_or(QuartoError::InconsistentState("no open cell left"))?;
        self.apply_move(Move::new(position, NO_PIECE))?;
        Ok(position)
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        rules::is_game_over(&self.board)
    }

    /// Sem casas livres
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.available_positions.is_empty()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_valid() {
        let state = GameState::new();
        assert!(state.validate().is_ok());
        assert_eq!(state.available_pieces.len(), 16);
        assert_eq!(state.available_positions.len(), 16);
        assert_eq!(state.current_piece, NO_PIECE);
    }

    #[test]
    fn test_apply_move_keeps_partition() {
        let mut state = GameState::new();
        state.choose_first_piece(5).unwrap();
        state.apply_move(Move::new(10, 3)).unwrap();
        assert_eq!(state.board.get(10), 5);
        assert_eq!(state.current_piece, 3);
        assert!(!state.available_positions.contains(10));
        assert!(!state.available_pieces.contains(3));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_invalid_moves_do_not_mutate() {
        let mut state = GameState::new();
        state.choose_first_piece(0).unwrap();
        state.apply_move(Move::new(0, 1)).unwrap();
        let before = state;

        assert!(matches!(state.apply_move(Move::new(0, 2)), Err(QuartoError::CellOccupied(0))));
        assert!(matches!(state.apply_move(Move::new(1, 0)), Err(QuartoError::PieceUnavailable(0))));
        assert!(matches!(state.apply_move(Move::new(17, 2)), Err(QuartoError::InvalidPosition(17))));
        assert!(matches!(state.apply_move(Move::new(1, NO_PIECE)), Err(QuartoError::PieceUnavailable(16))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_first_piece_twice_fails() {
        let mut state = GameState::new();
        state.choose_first_piece(7).unwrap();
        assert!(state.choose_first_piece(8).is_err());
        let mut other = GameState::new();
        assert!(matches!(other.choose_first_piece(16), Err(QuartoError::InvalidPiece(16))));
    }

    #[test]
    fn test_full_game_until_last_piece() {
        let mut state = GameState::new();
        state.choose_first_piece(0).unwrap();
        for i in 0..15u8 {
            state.apply_move(Move::new(i, i + 1)).unwrap();
        }
        assert_eq!(state.available_pieces.len(), 0);
        assert_eq!(state.current_piece, 15);
        let last = state.place_last_piece().unwrap();
        assert_eq!(last, 15);
        assert!(state.board.is_full());
        assert!(state.is_exhausted());
        assert_eq!(state.current_piece, NO_PIECE);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_from_key_round_trip() {
        let mut state = GameState::new();
        state.choose_first_piece(9).unwrap();
        state.apply_move(Move::new(4, 2)).unwrap();
        state.apply_move(Move::new(11, 14)).unwrap();
        let rebuilt = GameState::from_key(state.key()).unwrap();
        assert_eq!(rebuilt, state);
    }

    #[test]
    fn test_board_rejects_duplicates() {
        let mut cells = [EMPTY_CELL; 16];
        cells[0] = 3;
        cells[5] = 3;
        assert!(Board::from_cells(cells).is_err());
        cells[5] = 17;
        assert!(matches!(Board::from_cells(cells), Err(QuartoError::InvalidPiece(17))));
    }

    #[test]
    fn test_validate_detects_broken_partition() {
        let mut state = GameState::new();
        state.choose_first_piece(1).unwrap();
        state.available_pieces.insert(1);
        assert!(state.validate().is_err());
    }
}
