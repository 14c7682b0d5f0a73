pub mod geodesy;
pub mod rotation;
pub mod vec;

pub use geodesy::*;
pub use rotation::*;
pub use vec::*;
