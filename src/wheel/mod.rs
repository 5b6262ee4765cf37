pub mod config;
pub mod segment;

pub use config::*;
pub use segment::*;
