use crate::prelude::{ensure_finite, KernelError, KernelResult, Real};

/// Maps sky-plane offsets to disk-plane radii for a given inclination.
///
/// Position angle is measured east of north with the orbital node along the
/// north-south axis, so only the x offset is stretched by `1 / cos(inc)`.
///
/// Inclinations with `|cos(inc)| <= sqrt(epsilon)` of the kernel precision are
/// rejected as edge-on: about 89.9999991 deg in `f64` and 89.98 deg in `f32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deprojector<T: Real> {
    inclination_deg: T,
    cos_inc: T,
}

impl<T: Real> Deprojector<T> {
    pub fn new(inclination_deg: T) -> KernelResult<Self> {
        ensure_finite(inclination_deg.to_f64().unwrap_or(f64::NAN), "inclination")?;
        let cos_inc = (inclination_deg / T::from_real(180.0) * T::PI()).cos();
        if cos_inc.abs() <= T::epsilon().sqrt() {
            return Err(KernelError::Degenerate(format!(
                "inclination {:?} deg is edge-on, cos(inc) vanishes",
                inclination_deg
            )));
        }
        Ok(Self {
            inclination_deg,
            cos_inc,
        })
    }

    pub fn inclination_deg(&self) -> T {
        self.inclination_deg
    }

    pub fn cos_inc(&self) -> T {
        self.cos_inc
    }

    /// Stretches an x offset into the disk plane.
    pub fn stretch_x(&self, x: T) -> T {
        x / self.cos_inc
    }

    pub fn radius(&self, x: T, y: T) -> T {
        self.stretch_x(x).hypot(y)
    }
}
