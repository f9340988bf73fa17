pub mod board;
pub mod budget;
pub mod config;
pub mod error;
pub mod format;
pub mod metrics;
pub mod parse;
pub mod ranking;
pub mod task;

pub use board::BoardState;
pub use config::Config;
pub use error::*;
pub use ranking::rank_focus;
pub use task::{Status, TaskRecord};
