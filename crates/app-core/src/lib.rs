pub mod camera;
pub mod constants;
pub mod fix;
pub mod geo;
pub mod pulse;
pub mod snapshot;
pub static GLOBE_WGSL: &str = include_str!("../shaders/globe.wgsl");

pub use camera::*;
pub use constants::*;
pub use fix::*;
pub use geo::*;
pub use pulse::*;
pub use snapshot::*;
