pub mod input;
pub mod model;
pub mod session;

pub use input::*;
pub use model::*;
pub use session::*;
