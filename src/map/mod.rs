mod geometry;
pub mod palette;
mod projection;
mod renderer;
mod spatial;

pub use projection::Viewport;
pub use renderer::{ChoroplethLayers, ChoroplethRenderer, DisplaySettings};
pub use spatial::CountryIndex;
