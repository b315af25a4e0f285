mod pair;
mod raster;
mod text;

pub use pair::*;
pub use raster::*;
pub use text::*;
