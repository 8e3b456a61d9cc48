// Ficheiro: src/core/rules.rs
// Descrição: Detecção de linhas vencedoras (atributo comum entre 4 peças).

use super::board::Board;
use super::encoding::PositionKey;
use super::types::*;

/// As 10 linhas: 4 linhas, 4 colunas e as 2 diagonais (índices row-major).
pub const LINES: [[u8; 4]; 10] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [8, 9, 10, 11],
    [12, 13, 14, 15],
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [3, 6, 9, 12],
];

/// Existe uma coluna de bits idêntica em todas as peças?
///
/// `and` acumula os atributos ligados em todas; `not_and` os desligados
/// em todas (NOT mascarado a 4 bits). Há atributo comum sse `and | not_and > 0`.
#[inline(always)]
pub fn matching_property_exists(pieces: &[u8]) -> bool {
    let Some((&first, rest)) = pieces.split_first() else {
        return false;
    };
    let mut bitwise_and = first & ATTRIBUTE_MASK;
    let mut bitwise_not_and = !first & ATTRIBUTE_MASK;
    for &piece in rest {
        bitwise_and &= piece;
        bitwise_not_and &= !piece & ATTRIBUTE_MASK;
    }
    (bitwise_and | bitwise_not_and) > 0
}

/// Linha completa (sem casas vazias) e com atributo comum
#[inline(always)]
pub fn line_wins(values: [u8; 4]) -> bool {
    if values.contains(&EMPTY_CELL) {
        return false;
    }
    matching_property_exists(&values)
}

/// Alguma das 10 linhas está ganha? Um empate por esgotamento não é terminal aqui.
pub fn is_game_over(board: &Board) -> bool {
    LINES
        .iter()
        .any(|&line| line_wins(line.map(|p| board.get(p))))
}

/// Mesma verificação diretamente sobre a chave empacotada (chamada em todo nó da busca).
#[inline]
pub fn is_game_over_key(key: PositionKey) -> bool {
    LINES
        .iter()
        .any(|&line| line_wins(line.map(|p| key.cell(p))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoding::encode;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn shares_attribute_brute_force(pieces: &[u8; 4]) -> bool {
        (0..4).any(|bit| {
            let first = (pieces[0] >> bit) & 1;
            pieces.iter().all(|p| (p >> bit) & 1 == first)
        })
    }

    #[test]
    fn test_bit_trick_exhaustive() {
        // 16^4 combinações
        for a in 0..16u8 {
            for b in 0..16u8 {
                for c in 0..16u8 {
                    for d in 0..16u8 {
                        let line = [a, b, c, d];
                        assert_eq!(
                            matching_property_exists(&line),
                            shares_attribute_brute_force(&line),
                            "line {:?}",
                            line
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_line_with_empty_cell_never_wins() {
        assert!(!line_wins([1, 3, 5, EMPTY_CELL]));
        assert!(line_wins([1, 3, 5, 7]));
        // 0b0001, 0b0010, 0b0100, 0b1000: nenhum bit igual nas quatro
        assert!(!line_wins([1, 2, 4, 8]));
        assert!(!line_wins([0, 15, 5, 10]));
    }

    #[test]
    fn test_every_line_is_detected() {
        for line in LINES.iter() {
            let mut board = Board::EMPTY;
            for (k, &p) in line.iter().enumerate() {
                // 0, 2, 4, 6: todas pares -> bit 0 desligado em comum
                board.place(p, (k as u8) * 2);
            }
            assert!(is_game_over(&board), "line {:?}", line);
            assert!(is_game_over_key(encode(&board, NO_PIECE)));
        }
    }

    #[test]
    fn test_completing_row_with_odd_piece() {
        let mut board = Board::EMPTY;
        board.place(0, 1);
        board.place(1, 3);
        board.place(2, 5);
        assert!(!is_game_over(&board));
        let key = encode(&board, 7);
        assert!(!is_game_over_key(key));

        let next = key.successor(3, NO_PIECE);
        assert!(is_game_over_key(next));
        board.place(3, 7);
        assert!(is_game_over(&board));
    }

    #[test]
    fn test_structured_and_encoded_forms_agree() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5_000 {
            let mut pieces: Vec<u8> = (0..16).collect();
            pieces.shuffle(&mut rng);
            let mut board = Board::EMPTY;
            let filled = rng.gen_range(0..=16usize);
            let mut positions: Vec<u8> = (0..16).collect();
            positions.shuffle(&mut rng);
            for k in 0..filled {
                board.place(positions[k], pieces[k]);
            }
            let current = if filled < 16 { pieces[filled] } else { NO_PIECE };
            assert_eq!(is_game_over(&board), is_game_over_key(encode(&board, current)));
        }
    }

    #[test]
    fn test_draw_board_is_not_terminal() {
        // Tabuleiro cheio sem nenhuma linha com atributo comum
        let rows = [[12, 8, 2, 7], [5, 0, 10, 4], [11, 14, 9, 3], [1, 13, 6, 15]];
        let board = Board::from_rows(rows).unwrap();
        assert!(board.is_full());
        assert!(!is_game_over(&board));
        assert!(!is_game_over_key(encode(&board, NO_PIECE)));
    }
}
