pub mod commands;
pub mod config;
pub mod events;

pub use commands::*;
pub use config::*;
pub use events::*;
