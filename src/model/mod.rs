pub mod catalog;
pub mod config;
pub mod entry;

pub use catalog::*;
pub use config::*;
pub use entry::*;
