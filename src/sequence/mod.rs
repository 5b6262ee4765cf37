pub mod conversion;
pub mod definition;
pub mod loader;
pub mod validation;

pub use conversion::*;
pub use definition::*;
