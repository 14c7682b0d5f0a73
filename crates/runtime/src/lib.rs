pub mod debounce;
pub mod event_bus;
pub mod frame;
pub mod tween;

pub use debounce::*;
pub use event_bus::*;
pub use frame::*;
pub use tween::*;
