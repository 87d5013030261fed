pub mod calculator;
pub mod table;

pub use calculator::EmissionCalculator;
pub use table::{EmissionTable, TableError};
