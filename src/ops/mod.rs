pub mod filter;
pub mod landmarks;
pub mod overlay;
pub mod reveal;
pub mod timer;
pub mod visibility;
