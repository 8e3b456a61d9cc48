use crate::core::*;

/// Linha a um lance da vitória: exatamente uma casa vazia e as 3 peças
/// presentes já partilham um atributo.
#[inline(always)]
fn is_one_away(values: [u8; 4]) -> bool {
    let mut filled = [0u8; 3];
    let mut count = 0;
    for value in values {
        if value != EMPTY_CELL {
            if count == 3 {
                return false;
            }
            filled[count] = value;
            count += 1;
        }
    }
    count == 3 && matching_property_exists(&filled)
}

/// Avaliação estática do ponto de vista de quem vai jogar: número de linhas
/// a um lance de ficarem completas com atributo comum. Sem lookahead.
pub fn evaluate(key: PositionKey) -> i32 {
    LINES
        .iter()
        .filter(|&&line| is_one_away(line.map(|p| key.cell(p))))
        .count() as i32
}

/// Mesma avaliação sobre a forma estruturada
pub fn evaluate_board(board: &Board) -> i32 {
    LINES
        .iter()
        .filter(|&&line| is_one_away(line.map(|p| board.get(p))))
        .count() as i32
}
