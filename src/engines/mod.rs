pub mod generation;
pub mod manipulation;
