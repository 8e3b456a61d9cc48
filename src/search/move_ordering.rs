use crate::core::*;

/// Gera os candidatos de um nó em ordem piece-major: todas as casas livres
/// para uma peça a entregar antes de passar à peça seguinte. Para depois de
/// `window` candidatos (janela de busca).
///
/// Sem peças para entregar (último lance da partida) itera uma única rodada
/// com o sentinela `NO_PIECE` como peça entregue.
pub fn candidate_moves(pieces: IndexSet, positions: IndexSet, window: usize) -> CandidateMoves {
    let pieces = if pieces.is_empty() { IndexSet::single(NO_PIECE) } else { pieces };
    let mut piece_iter = pieces.iter();
    let piece = piece_iter.next();
    CandidateMoves {
        piece_iter,
        piece,
        positions,
        position_iter: positions.iter(),
        remaining: window,
    }
}

pub struct CandidateMoves {
    piece_iter: IndexSetIter,
    piece: Option<u8>,
    positions: IndexSet,
    position_iter: IndexSetIter,
    remaining: usize,
}

impl Iterator for CandidateMoves {
    type Item = Move;

    #[inline]
    fn next(&mut self) -> Option<Move> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let piece = self.piece?;
            if let Some(position) = self.position_iter.next() {
                self.remaining -= 1;
                return Some(Move::new(position, piece));
            }
            self.piece = self.piece_iter.next();
            self.position_iter = self.positions.iter();
        }
    }
}
