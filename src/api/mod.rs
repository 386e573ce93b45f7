pub mod calculate;

pub use calculate::{calculate, compute, Calculation, CalculateError};
