// Formato binário da tabela de transposição persistida (little-endian):
//   "QTT1" | versão u8 | 3 bytes reservados | contagem u32 | registos | CRC32C
// Registo (20 bytes): chave u128 | avaliação i8 | casa u8 | peça u8 | padding u8

use std::fs;
use std::path::Path;

use super::tt::TTEntry;
use crate::core::{Move, PositionKey, EMPTY_CELL};
use crate::error::TableError;

const MAGIC: &[u8; 4] = b"QTT1";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 3 + 4;
const RECORD_LEN: usize = 20;
const CHECKSUM_LEN: usize = 4;

/// Extensão dos ficheiros de tabela
pub const TABLE_EXTENSION: &str = "qtt";

#[inline]
fn read_u32_le(bytes: &[u8]) -> Option<u32> {
    if bytes.len() < 4 {
        return None;
    }
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Serializa os registos (ordenados por chave para ficheiros estáveis).
pub fn encode_table(entries: &[(PositionKey, TTEntry)]) -> Result<Vec<u8>, TableError> {
    let count: u32 = entries
        .len()
        .try_into()
        .map_err(|_| TableError::Malformed("too many records"))?;

    let mut sorted: Vec<&(PositionKey, TTEntry)> = entries.iter().collect();
    sorted.sort_unstable_by_key(|(key, _)| *key);

    let mut buf = Vec::with_capacity(HEADER_LEN + entries.len() * RECORD_LEN + CHECKSUM_LEN);
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&[0u8; 3]);
    buf.extend_from_slice(&count.to_le_bytes());

    for (key, entry) in sorted {
        buf.extend_from_slice(&key.raw().to_le_bytes());
        buf.push(entry.score as u8);
        buf.push(entry.best_move.position);
        buf.push(entry.best_move.next_piece);
        buf.push(0);
    }

    let checksum = crc32c::crc32c(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

pub fn parse_table(bytes: &[u8]) -> Result<Vec<(PositionKey, TTEntry)>, TableError> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(TableError::Malformed("file too short"));
    }

    // Checksum primeiro para não ler campos de um ficheiro corrompido
    let (content, trailer) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let file_crc = read_u32_le(trailer).ok_or(TableError::Malformed("missing checksum"))?;
    if file_crc != crc32c::crc32c(content) {
        return Err(TableError::Checksum);
    }

    if &content[..4] != MAGIC || content[4] != VERSION {
        return Err(TableError::MagicOrVersion);
    }
    let count = read_u32_le(&content[8..]).ok_or(TableError::Malformed("missing count"))? as usize;
    let expected_len = count
        .checked_mul(RECORD_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN))
        .ok_or(TableError::Malformed("record count overflow"))?;
    if content.len() != expected_len {
        return Err(TableError::Malformed("record count does not match file length"));
    }

    let mut entries = Vec::with_capacity(count);
    for (index, record) in content[HEADER_LEN..].chunks_exact(RECORD_LEN).enumerate() {
        let mut raw = [0u8; 16];
        raw.copy_from_slice(&record[..16]);
        let key = PositionKey::from_raw(u128::from_le_bytes(raw))
            .ok_or(TableError::InvalidRecord { index })?;
        let score = record[16] as i8;
        let position = record[17];
        let next_piece = record[18];
        if position > EMPTY_CELL || next_piece > EMPTY_CELL {
            return Err(TableError::InvalidRecord { index });
        }
        entries.push((key, TTEntry { score, best_move: Move::new(position, next_piece) }));
    }
    Ok(entries)
}

pub fn write_table<P: AsRef<Path>>(path: P, entries: &[(PositionKey, TTEntry)]) -> Result<(), TableError> {
    let data = encode_table(entries)?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data)?;
    Ok(())
}

pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Vec<(PositionKey, TTEntry)>, TableError> {
    let data = fs::read(path)?;
    parse_table(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, NO_PIECE};
    use tempfile::NamedTempFile;

    fn sample_entries() -> Vec<(PositionKey, TTEntry)> {
        let mut board = Board::EMPTY;
        board.place(5, 9);
        vec![
            (PositionKey::EMPTY, TTEntry { score: 0, best_move: Move::new(3, 4) }),
            (PositionKey::encode(&board, 2), TTEntry { score: -10, best_move: Move::new(0, NO_PIECE) }),
            (PositionKey::encode(&board, 7), TTEntry { score: 10, best_move: Move::NULL }),
        ]
    }

    #[test]
    fn file_round_trip() {
        let entries = sample_entries();
        let tmp = NamedTempFile::new().unwrap();
        write_table(tmp.path(), &entries).unwrap();
        let mut loaded = read_table(tmp.path()).unwrap();
        let mut expected = entries.clone();
        loaded.sort_by_key(|(k, _)| *k);
        expected.sort_by_key(|(k, _)| *k);
        assert_eq!(loaded, expected);
    }

    #[test]
    fn empty_table_layout() {
        let bytes = encode_table(&[]).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + CHECKSUM_LEN);
        assert_eq!(&bytes[..4], MAGIC);
        assert!(parse_table(&bytes).unwrap().is_empty());
    }

    #[test]
    fn checksum_mismatch() {
        let mut bytes = encode_table(&sample_entries()).unwrap();
        bytes[HEADER_LEN + 3] ^= 0xFF;
        assert!(matches!(parse_table(&bytes), Err(TableError::Checksum)));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let mut bytes = encode_table(&sample_entries()).unwrap();
        bytes.truncate(bytes.len() - 5);
        assert!(parse_table(&bytes).is_err());
        assert!(matches!(parse_table(&bytes[..6]), Err(TableError::Malformed(_))));
    }

    #[test]
    fn bad_magic() {
        let mut bytes = encode_table(&[]).unwrap();
        bytes[0] = b'X';
        let len = bytes.len();
        let crc = crc32c::crc32c(&bytes[..len - 4]);
        bytes[len - 4..].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(parse_table(&bytes), Err(TableError::MagicOrVersion)));
    }

    #[test]
    fn invalid_record_field() {
        let mut bytes = encode_table(&sample_entries()).unwrap();
        bytes[HEADER_LEN + 17] = 40; // casa fora de 0..=16
        let len = bytes.len();
        let crc = crc32c::crc32c(&bytes[..len - 4]);
        bytes[len - 4..].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(parse_table(&bytes), Err(TableError::InvalidRecord { index: 0 })));
    }
}
