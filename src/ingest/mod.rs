pub mod csv;
pub mod probabilities;
pub mod synthetic;
