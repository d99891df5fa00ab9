pub mod script;
pub mod session;
pub mod state;

pub use script::*;
pub use session::*;
pub use state::*;
