pub mod board;
pub mod encoding;
pub mod rules;
pub mod types;

pub use board::*;
pub use encoding::*;
pub use rules::*;
pub use types::*;
