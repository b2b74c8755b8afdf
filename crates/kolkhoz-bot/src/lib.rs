pub mod strategy;

pub use strategy::{GreedyStrategy, RandomStrategy, Strategy, SwapChoice};
