pub mod event;
pub mod health;
pub mod statistics;

pub use event::*;
pub use health::*;
pub use statistics::*;
