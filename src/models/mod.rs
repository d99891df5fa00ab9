pub mod catalog;
pub mod chatlog;
pub mod qa;

pub use catalog::*;
pub use chatlog::*;
pub use qa::*;
