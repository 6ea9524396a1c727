pub mod api;
pub mod cli;
pub mod content;
mod context;
pub mod dashboard;
pub mod forms;
pub mod listen_live;
pub mod refresher;
pub mod tracker;

pub use context::AppContext;
