pub mod negamax;
pub mod evaluation;
pub mod move_ordering;

pub use negamax::*;
pub use evaluation::*;
pub use move_ordering::*;
