pub mod entities;
pub mod report;

pub use entities::*;
pub use report::*;
