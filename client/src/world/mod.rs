pub mod level;
pub mod water;

pub use level::*;
pub use water::*;
