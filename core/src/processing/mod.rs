pub mod reference;
pub mod shift;
pub mod sweep;

pub use reference::{AxisOrientation, ReferenceImage};
pub use shift::{FourierGrid, PhaseShift};
pub use sweep::{LoopSweep, MeshSweep, SweepConfig, SweepStrategy, SweepWindow};
