pub mod boundaries;
pub mod clip;
pub mod graticule;
pub mod stations;
pub mod symbology;

pub use boundaries::*;
pub use clip::*;
pub use graticule::*;
pub use stations::*;
pub use symbology::*;
