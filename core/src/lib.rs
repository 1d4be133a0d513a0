//! Numerical kernels for interferometric image simulation.
//!
//! A radial brightness profile is swept into a 2-D image (`processing::sweep`),
//! Fourier grids are sampled at arbitrary (u, v) points through
//! `geometry::uv` and `math::bilinear`, and real-space translations are
//! applied as phase ramps either to a whole centred transform or to scattered
//! visibilities (`processing::shift`).
//!
//! Every kernel is a pure function of its inputs and is generic over the
//! floating-point width through [`prelude::Real`].

pub mod geometry;
pub mod math;
pub mod prelude;
pub mod processing;

pub use prelude::{KernelError, KernelResult, Real, JY, SEC2RAD};
