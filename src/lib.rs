pub mod controller;
pub mod game;
pub mod utils;

#[cfg(test)]
mod test;

pub use crate::game::*;
pub use crate::utils::*;
