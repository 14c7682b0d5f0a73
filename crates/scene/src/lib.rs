pub mod config;
pub mod controller;
pub mod interaction;
pub mod picking;
pub mod projection;
pub mod stations;
pub mod visibility;

pub use config::*;
pub use controller::*;
pub use interaction::*;
pub use projection::*;
pub use stations::*;
pub use visibility::*;
