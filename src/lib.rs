pub mod circuit;
pub mod common;
pub mod gate;
pub mod graph;
pub mod layout;
pub mod logic;
pub mod simulator;
pub mod utils;
