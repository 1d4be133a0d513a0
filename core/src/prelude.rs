use num_traits::{Float, FloatConst};
use std::fmt::Debug;

/// Arcseconds to radians.
pub const SEC2RAD: f64 = std::f64::consts::PI / 180.0 / 3600.0;

/// One Jansky in cgs flux-density units (1 Jy = 1e-23 erg s^-1 cm^-2 Hz^-1).
pub const JY: f64 = 1.0e23;

/// Floating-point width accepted by every kernel.
pub trait Real: Float + FloatConst + Default + Debug + Send + Sync + 'static {
    fn from_real(value: f64) -> Self;
    fn from_index(value: usize) -> Self;
}

impl Real for f32 {
    fn from_real(value: f64) -> Self {
        value as f32
    }

    fn from_index(value: usize) -> Self {
        value as f32
    }
}

impl Real for f64 {
    fn from_real(value: f64) -> Self {
        value
    }

    fn from_index(value: usize) -> Self {
        value as f64
    }
}

/// Common error type for kernel execution.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("sample {index} at ({x}, {y}) leaves the {rows}x{cols} grid")]
    OutOfRange {
        index: usize,
        x: f64,
        y: f64,
        rows: usize,
        cols: usize,
    },
    #[error("numeric degeneracy: {0}")]
    Degenerate(String),
}

pub type KernelResult<T> = Result<T, KernelError>;

pub(crate) fn ensure_finite(value: f64, what: &str) -> KernelResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(KernelError::InvalidInput(format!(
            "{} must be finite, got {}",
            what, value
        )))
    }
}

pub(crate) fn ensure_positive(value: f64, what: &str) -> KernelResult<()> {
    ensure_finite(value, what)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::Degenerate(format!(
            "{} must be positive, got {}",
            what, value
        )))
    }
}
