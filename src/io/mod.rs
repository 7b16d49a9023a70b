pub mod catalog_io;
pub mod clipboard;
pub mod config_io;
pub mod logging;
