pub mod deproject;
pub mod radial;
pub mod uv;

pub use deproject::Deprojector;
pub use radial::{ProfileShape, RadialGrid, RadialProfile};
pub use uv::{
    centered_frequencies, pixel_coordinates, FourierLayout, PixelIndices, UvCoordinates, UvMapper,
};
