pub mod persist;
pub mod tt;

pub use tt::*;
