use crate::prelude::{ensure_finite, ensure_positive, KernelError, KernelResult, Real};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Uniform radial grid: radius at index `i` is `rmin + i * dr`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGrid<T: Real> {
    rmin: T,
    dr: T,
    len: usize,
}

impl<T: Real> RadialGrid<T> {
    pub fn new(rmin: T, dr: T, len: usize) -> KernelResult<Self> {
        let rmin_f = rmin.to_f64().unwrap_or(f64::NAN);
        ensure_finite(rmin_f, "Rmin")?;
        ensure_positive(dr.to_f64().unwrap_or(f64::NAN), "deltaR")?;
        if rmin_f < 0.0 {
            return Err(KernelError::Precondition(format!(
                "Rmin must be non-negative, got {}",
                rmin_f
            )));
        }
        if len < 2 {
            return Err(KernelError::Precondition(format!(
                "radial grid needs at least 2 points, got {}",
                len
            )));
        }
        Ok(Self { rmin, dr, len })
    }

    pub fn rmin(&self) -> T {
        self.rmin
    }

    pub fn dr(&self) -> T {
        self.dr
    }

    /// Number of grid points; never below 2.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn radius(&self, index: usize) -> T {
        self.rmin + T::from_index(index) * self.dr
    }

    /// Radius of the last grid point, `rmin + (n - 1) * dr`.
    pub fn outer_radius(&self) -> T {
        self.radius(self.len - 1)
    }

    pub fn radii(&self) -> Array1<T> {
        Array1::from_shape_fn(self.len, |i| self.radius(i))
    }
}

/// Analytic shapes used to synthesise a profile on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ProfileShape {
    /// `exp(-(r / dr / width)^2)`.
    Gauss { width: f64 },
    /// Cosine-tapered Gaussian, `cos^2(2 pi r / (50 dr)) * exp(-(r / dr / 80)^2)`.
    CosGauss,
}

impl Default for ProfileShape {
    fn default() -> Self {
        ProfileShape::Gauss { width: 100.0 }
    }
}

/// Axisymmetric intensity profile aligned 1:1 with its grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialProfile<T: Real> {
    grid: RadialGrid<T>,
    values: Array1<T>,
}

impl<T: Real> RadialProfile<T> {
    pub fn from_values(grid: RadialGrid<T>, values: Vec<T>) -> KernelResult<Self> {
        if values.len() != grid.len() {
            return Err(KernelError::InvalidInput(format!(
                "profile has {} values for a grid of {} points",
                values.len(),
                grid.len()
            )));
        }
        Ok(Self {
            grid,
            values: Array1::from(values),
        })
    }

    pub fn generate(grid: RadialGrid<T>, shape: ProfileShape) -> KernelResult<Self> {
        let dr = grid.dr();
        let values = match shape {
            ProfileShape::Gauss { width } => {
                ensure_positive(width, "Gauss width")?;
                let width = T::from_real(width);
                grid.radii().mapv(|r| (-(r / dr / width).powi(2)).exp())
            }
            ProfileShape::CosGauss => {
                let period = T::from_real(50.0) * dr;
                let taper = T::from_real(80.0);
                grid.radii().mapv(|r| {
                    let ring = (T::from_real(2.0) * T::PI() * r / period).cos();
                    ring * ring * (-(r / dr / taper).powi(2)).exp()
                })
            }
        };
        Ok(Self { grid, values })
    }

    pub fn grid(&self) -> &RadialGrid<T> {
        &self.grid
    }

    pub fn values(&self) -> ArrayView1<'_, T> {
        self.values.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rejects_degenerate_parameters() {
        assert!(matches!(
            RadialGrid::new(0.0, 0.0, 4),
            Err(KernelError::Degenerate(_))
        ));
        assert!(matches!(
            RadialGrid::new(0.0, 1.0, 1),
            Err(KernelError::Precondition(_))
        ));
        assert!(matches!(
            RadialGrid::new(-0.5, 1.0, 4),
            Err(KernelError::Precondition(_))
        ));
    }

    #[test]
    fn grid_radii_are_uniform() {
        let grid = RadialGrid::new(0.1f64, 0.5, 5).unwrap();
        let radii = grid.radii();
        assert_eq!(radii.len(), 5);
        assert!((radii[4] - 2.1).abs() < 1e-12);
        assert!((grid.outer_radius() - 2.1).abs() < 1e-12);
    }

    #[test]
    fn gauss_profile_is_monotone() {
        let grid = RadialGrid::new(0.0f32, 1.0, 200).unwrap();
        let profile = RadialProfile::generate(grid, ProfileShape::default()).unwrap();
        let values = profile.values();
        assert_eq!(values[0], 1.0);
        assert!(values.windows(2).into_iter().all(|w| w[1] <= w[0]));
    }

    #[test]
    fn cos_gauss_profile_has_zero_at_quarter_period() {
        let grid = RadialGrid::new(0.0f64, 1.0, 64).unwrap();
        let profile = RadialProfile::generate(grid, ProfileShape::CosGauss).unwrap();
        assert!((profile.values()[0] - 1.0).abs() < 1e-12);
        // cos(2 pi * 12.5 / 50) = 0 lies between samples 12 and 13.
        assert!(profile.values()[12] < 0.01);
    }

    #[test]
    fn profile_length_must_match_grid() {
        let grid = RadialGrid::new(0.0, 1.0, 3).unwrap();
        assert!(RadialProfile::from_values(grid, vec![1.0, 0.5]).is_err());
    }

    #[test]
    fn profile_shape_parses_from_json() {
        let shape: ProfileShape =
            serde_json::from_str(r#"{"mode":"gauss","width":40.0}"#).unwrap();
        assert_eq!(shape, ProfileShape::Gauss { width: 40.0 });
        let shape: ProfileShape = serde_json::from_str(r#"{"mode":"cos-gauss"}"#).unwrap();
        assert_eq!(shape, ProfileShape::CosGauss);
    }
}
