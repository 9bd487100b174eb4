pub mod assembler;
pub mod frame_channel;
pub mod sink;
pub mod timing;

pub use assembler::*;
pub use frame_channel::*;
pub use sink::*;
pub use timing::*;
