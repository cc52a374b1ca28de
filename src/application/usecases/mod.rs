pub mod attempt;

pub use attempt::*;
