pub mod stations;
pub mod topojson;
pub mod vector_chunk;
pub mod world;

pub use stations::*;
pub use topojson::*;
pub use vector_chunk::*;
pub use world::*;
