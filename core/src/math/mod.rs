pub mod bilinear;
pub mod interp;

pub use bilinear::{BilinearSampler, Blend};
pub use interp::{Boundary, LinearInterp};
