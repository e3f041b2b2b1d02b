pub mod nominatim;
pub mod resolver;

pub use nominatim::*;
pub use resolver::*;
