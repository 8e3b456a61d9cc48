//! Configuração por variáveis de ambiente.
//!
//! `QUARTO_TABLES_DIR` (default `"tables"`) e `QUARTO_THREADS`
//! (default: número de CPUs). As flags do binário têm prioridade.

use std::path::PathBuf;

pub const TABLES_DIR_VAR: &str = "QUARTO_TABLES_DIR";
pub const THREADS_VAR: &str = "QUARTO_THREADS";
pub const DEFAULT_TABLES_DIR: &str = "tables";

/// Diretório das tabelas de transposição persistidas.
pub fn tables_dir() -> PathBuf {
    std::env::var(TABLES_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_TABLES_DIR))
}

/// Número de threads para séries paralelas (valores inválidos ou 0 caem no default).
pub fn thread_count() -> usize {
    parse_threads(std::env::var(THREADS_VAR).ok().as_deref()).unwrap_or_else(num_cpus::get)
}

fn parse_threads(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// Inicializa o pool global do rayon. Tolera um pool já inicializado
/// (testes, chamadas repetidas). Devolve o número de threads pedido.
pub fn init_rayon_threads_lenient(threads: Option<usize>) -> usize {
    let num_threads = threads.filter(|&n| n > 0).unwrap_or_else(thread_count);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        log::debug!("rayon pool already initialised, keeping {} threads", rayon::current_num_threads());
    }
    log::info!("rayon threads: {}", num_threads);
    num_threads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threads() {
        assert_eq!(parse_threads(Some("4")), Some(4));
        assert_eq!(parse_threads(Some(" 2 ")), Some(2));
        assert_eq!(parse_threads(Some("0")), None);
        assert_eq!(parse_threads(Some("many")), None);
        assert_eq!(parse_threads(None), None);
    }

    #[test]
    fn test_thread_count_is_positive() {
        assert!(thread_count() >= 1);
    }

    #[test]
    fn test_lenient_init_can_repeat() {
        assert_eq!(init_rayon_threads_lenient(Some(2)), 2);
        assert_eq!(init_rayon_threads_lenient(Some(3)), 3);
    }
}
