use crate::geometry::radial::RadialProfile;
use crate::prelude::Real;
use serde::{Deserialize, Serialize};

/// Policy for radii outside the profile support `[rmin, rmin + (n - 1) * dr)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Outside the support the profile is zero.
    Zero,
    /// Continue the first (or last) segment linearly.
    Extrapolate,
}

/// Piecewise-linear lookup into a radial profile.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterp<'a, T: Real> {
    profile: &'a RadialProfile<T>,
}

impl<'a, T: Real> LinearInterp<'a, T> {
    pub fn new(profile: &'a RadialProfile<T>) -> Self {
        Self { profile }
    }

    pub fn eval(&self, r: T, boundary: Boundary) -> T {
        let grid = self.profile.grid();
        let values = self.profile.values();
        let last_bin = grid.len() - 2;
        let position = (r - grid.rmin()) / grid.dr();

        let bin = match boundary {
            Boundary::Zero => {
                // NaN radii fall through to zero as well.
                if !(position >= T::zero()) || position >= T::from_index(last_bin + 1) {
                    return T::zero();
                }
                position.to_usize().unwrap_or(last_bin).min(last_bin)
            }
            Boundary::Extrapolate => {
                if position <= T::zero() {
                    0
                } else {
                    position.to_usize().unwrap_or(last_bin).min(last_bin)
                }
            }
        };

        let lo = values[bin];
        let hi = values[bin + 1];
        lo + (r - T::from_index(bin) * grid.dr() - grid.rmin()) * (hi - lo) / grid.dr()
    }
}
