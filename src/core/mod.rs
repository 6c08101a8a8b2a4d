pub mod element;
pub mod graph;
pub mod ids;
pub mod memory;
