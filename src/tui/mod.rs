pub mod app;
pub mod input;
pub mod page;
pub mod render;
pub mod theme;
pub mod viewport;
pub mod wrap;

pub use app::run;
