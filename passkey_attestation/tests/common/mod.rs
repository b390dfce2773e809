pub mod der;
pub mod fixtures;

pub use fixtures::*;
