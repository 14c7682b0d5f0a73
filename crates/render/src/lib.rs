pub mod draw;
pub mod globe;
pub mod renderer;
pub mod svg;

pub use draw::*;
pub use globe::*;
pub use renderer::*;
pub use svg::*;
