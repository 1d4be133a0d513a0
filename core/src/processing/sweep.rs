use crate::geometry::deproject::Deprojector;
use crate::geometry::radial::RadialProfile;
use crate::math::interp::{Boundary, LinearInterp};
use crate::prelude::{ensure_finite, ensure_positive, KernelError, KernelResult, Real};
use ndarray::{Array1, Array2, Zip};
use serde::{Deserialize, Serialize};

/// Image geometry shared by both sweep strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub nrow: usize,
    pub ncol: usize,
    /// Pixel size, in the same units as the radial grid.
    pub dxy: f64,
    pub inclination_deg: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            nrow: 512,
            ncol: 512,
            dxy: 0.01,
            inclination_deg: 0.0,
        }
    }
}

/// Validated geometry in kernel precision.
struct SweepGeometry<T: Real> {
    nrow: usize,
    ncol: usize,
    centre_row: usize,
    centre_col: usize,
    dxy: T,
    deprojector: Deprojector<T>,
}

impl SweepConfig {
    fn prepare<T: Real>(&self, profile: &RadialProfile<T>) -> KernelResult<SweepGeometry<T>> {
        if self.nrow == 0 || self.ncol == 0 {
            return Err(KernelError::Precondition(format!(
                "image must be non-empty, got {}x{}",
                self.nrow, self.ncol
            )));
        }
        ensure_positive(self.dxy, "dxy")?;
        ensure_finite(self.inclination_deg, "inclination")?;

        let dxy = T::from_real(self.dxy);
        let rmin = profile.grid().rmin();
        if rmin > dxy {
            return Err(KernelError::Precondition(format!(
                "Rmin {:?} must not exceed the pixel size {}",
                rmin, self.dxy
            )));
        }

        Ok(SweepGeometry {
            nrow: self.nrow,
            ncol: self.ncol,
            centre_row: self.nrow / 2,
            centre_col: self.ncol / 2,
            dxy,
            deprojector: Deprojector::new(T::from_real(self.inclination_deg))?,
        })
    }
}

/// Turns a radial profile into an image.
pub trait SweepStrategy {
    fn name(&self) -> &'static str;

    fn sweep<T: Real>(
        &self,
        profile: &RadialProfile<T>,
        config: &SweepConfig,
    ) -> KernelResult<Array2<T>>;
}

/// Pixels visited by [`LoopSweep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepWindow {
    /// Square window of half-width `ceil((rmin + n * dr) / dxy)` pixels around
    /// the centre, clipped to the image. Pixels outside stay zero.
    #[default]
    Profile,
    /// Every pixel.
    Full,
}

/// Reference nested-loop sweep with closed-form interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSweep {
    pub window: SweepWindow,
}

impl LoopSweep {
    pub fn new(window: SweepWindow) -> Self {
        Self { window }
    }

    fn half_width<T: Real>(profile: &RadialProfile<T>, dxy: T) -> usize {
        let grid = profile.grid();
        let extent = (grid.rmin() + T::from_index(grid.len()) * grid.dr()) / dxy;
        extent.ceil().to_usize().unwrap_or(usize::MAX)
    }
}

impl SweepStrategy for LoopSweep {
    fn name(&self) -> &'static str {
        "loop"
    }

    fn sweep<T: Real>(
        &self,
        profile: &RadialProfile<T>,
        config: &SweepConfig,
    ) -> KernelResult<Array2<T>> {
        let geom = config.prepare(profile)?;
        let grid = profile.grid();
        let values = profile.values();
        let (rmin, dr, nrad) = (grid.rmin(), grid.dr(), grid.len());

        let (rows, cols) = match self.window {
            SweepWindow::Full => (0..=geom.nrow - 1, 0..=geom.ncol - 1),
            SweepWindow::Profile => {
                let half = Self::half_width(profile, geom.dxy);
                (
                    geom.centre_row.saturating_sub(half)
                        ..=geom.centre_row.saturating_add(half).min(geom.nrow - 1),
                    geom.centre_col.saturating_sub(half)
                        ..=geom.centre_col.saturating_add(half).min(geom.ncol - 1),
                )
            }
        };
        log::debug!(
            "{} sweep {}x{} rows {:?} cols {:?}",
            self.name(),
            geom.nrow,
            geom.ncol,
            rows,
            cols
        );

        let mut image = Array2::<T>::zeros((geom.nrow, geom.ncol));
        for irow in rows {
            let y = (T::from_index(geom.centre_row) - T::from_index(irow)) * geom.dxy;
            for jcol in cols.clone() {
                let x = (T::from_index(geom.centre_col) - T::from_index(jcol)) * geom.dxy;
                let rr = geom.deprojector.radius(x, y);

                let position = ((rr - rmin) / dr).floor();
                // Radii below rmin or at/after the last grid point are truncated.
                let value = match position.to_usize() {
                    Some(ir) if position >= T::zero() && ir < nrad - 1 => {
                        values[ir]
                            + (rr - T::from_index(ir) * dr - rmin) * (values[ir + 1] - values[ir])
                                / dr
                    }
                    _ => T::zero(),
                };
                image[[irow, jcol]] = value;
            }
        }

        if rmin != T::zero() {
            image[[geom.centre_row, geom.centre_col]] =
                values[0] + rmin * (values[0] - values[1]) / dr;
        }

        Ok(image)
    }
}

/// Sweep over a full pixel-centre mesh, optionally offset from the image
/// centre by `(offset_x, offset_y)` pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSweep {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl MeshSweep {
    pub fn new(offset_x: f64, offset_y: f64) -> Self {
        Self { offset_x, offset_y }
    }
}

impl SweepStrategy for MeshSweep {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn sweep<T: Real>(
        &self,
        profile: &RadialProfile<T>,
        config: &SweepConfig,
    ) -> KernelResult<Array2<T>> {
        ensure_finite(self.offset_x, "offset_x")?;
        ensure_finite(self.offset_y, "offset_y")?;
        let geom = config.prepare(profile)?;
        log::debug!(
            "{} sweep {}x{} offset ({}, {})",
            self.name(),
            geom.nrow,
            geom.ncol,
            self.offset_x,
            self.offset_y
        );

        let offset_x = T::from_real(self.offset_x);
        let offset_y = T::from_real(self.offset_y);
        let centre_col = T::from_index(geom.centre_col);
        let centre_row = T::from_index(geom.centre_row);
        let xs = Array1::from_shape_fn(geom.ncol, |j| {
            (centre_col - T::from_index(j) - offset_x) * geom.dxy
        });
        let ys = Array1::from_shape_fn(geom.nrow, |i| {
            (centre_row - T::from_index(i) - offset_y) * geom.dxy
        });

        let interp = LinearInterp::new(profile);
        let deprojector = geom.deprojector;
        let mut image = Array2::<T>::zeros((geom.nrow, geom.ncol));
        Zip::indexed(&mut image).par_for_each(|(i, j), pixel| {
            *pixel = interp.eval(deprojector.radius(xs[j], ys[i]), Boundary::Zero);
        });

        image[[geom.centre_row, geom.centre_col]] = interp.eval(T::zero(), Boundary::Extrapolate);

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::radial::{ProfileShape, RadialGrid};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn gaussian(rmin: f64, dr: f64, n: usize, width: f64) -> RadialProfile<f64> {
        let grid = RadialGrid::new(rmin, dr, n).unwrap();
        RadialProfile::generate(grid, ProfileShape::Gauss { width }).unwrap()
    }

    fn config(nrow: usize, ncol: usize, dxy: f64, inclination_deg: f64) -> SweepConfig {
        SweepConfig {
            nrow,
            ncol,
            dxy,
            inclination_deg,
        }
    }

    #[test]
    fn small_gaussian_peaks_at_centre_and_decreases() {
        init_logging();
        let profile = gaussian(0.1, 1.0, 5, 1.0);
        let cfg = config(20, 20, 0.1, 0.0);
        let image = LoopSweep::default().sweep(&profile, &cfg).unwrap();

        let centre = image[[10, 10]];
        assert!(image.iter().all(|&v| v <= centre));

        let deproj = Deprojector::new(0.0).unwrap();
        let mut samples: Vec<(f64, f64)> = image
            .indexed_iter()
            .filter(|((i, j), _)| (*i, *j) != (10, 10))
            .map(|((i, j), &v)| {
                let x = (10.0 - j as f64) * 0.1;
                let y = (10.0 - i as f64) * 0.1;
                (deproj.radius(x, y), v)
            })
            .collect();
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert!(samples.windows(2).all(|w| w[1].1 <= w[0].1 + 1e-12));
    }

    #[test]
    fn loop_and_mesh_agree_on_even_image() {
        init_logging();
        let profile = gaussian(0.05, 0.02, 200, 60.0);
        let cfg = config(128, 128, 0.05, 35.0);
        let reference = LoopSweep::default().sweep(&profile, &cfg).unwrap();
        let mesh = MeshSweep::default().sweep(&profile, &cfg).unwrap();

        let outer = profile.grid().outer_radius();
        let deproj = Deprojector::new(35.0).unwrap();
        let mut truncated = 0;
        for ((i, j), &expected) in reference.indexed_iter() {
            let actual = mesh[[i, j]];
            assert!(
                (expected - actual).abs() <= 1e-6 * expected.abs().max(1e-12),
                "pixel ({}, {}) differs: {} vs {}",
                i,
                j,
                expected,
                actual
            );
            let r = deproj.radius((64.0 - j as f64) * 0.05, (64.0 - i as f64) * 0.05);
            if r > outer + 1e-9 {
                truncated += 1;
                assert_eq!(expected, 0.0);
                assert_eq!(actual, 0.0);
            }
        }
        assert!(truncated > 0);
    }

    #[test]
    fn windowed_and_full_loop_agree_on_odd_image() {
        let profile = gaussian(0.0, 0.1, 12, 10.0);
        let cfg = config(61, 65, 0.1, 20.0);
        let windowed = LoopSweep::new(SweepWindow::Profile)
            .sweep(&profile, &cfg)
            .unwrap();
        let full = LoopSweep::new(SweepWindow::Full).sweep(&profile, &cfg).unwrap();
        let mesh = MeshSweep::default().sweep(&profile, &cfg).unwrap();
        assert_eq!(windowed, full);
        for (a, b) in full.iter().zip(mesh.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn single_precision_sweeps_agree() {
        let grid = RadialGrid::new(0.02f32, 0.05, 64).unwrap();
        let profile = RadialProfile::generate(grid, ProfileShape::CosGauss).unwrap();
        let cfg = config(64, 64, 0.05, 45.0);
        let reference = LoopSweep::default().sweep(&profile, &cfg).unwrap();
        let mesh = MeshSweep::default().sweep(&profile, &cfg).unwrap();
        for (a, b) in reference.iter().zip(mesh.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn centre_pixel_is_extrapolated_to_origin() {
        let grid = RadialGrid::new(0.1f64, 0.2, 4).unwrap();
        let profile = RadialProfile::from_values(grid, vec![1.0, 0.6, 0.2, 0.0]).unwrap();
        let cfg = config(8, 8, 0.1, 0.0);
        let reference = LoopSweep::default().sweep(&profile, &cfg).unwrap();
        let mesh = MeshSweep::default().sweep(&profile, &cfg).unwrap();
        // 1.0 + 0.1 * (1.0 - 0.6) / 0.2
        assert!((reference[[4, 4]] - 1.2).abs() < 1e-12);
        assert!((mesh[[4, 4]] - 1.2).abs() < 1e-12);
    }

    #[test]
    fn offset_mesh_moves_the_peak() {
        let profile = gaussian(0.0, 0.1, 50, 5.0);
        let cfg = config(32, 32, 0.1, 0.0);
        let shifted = MeshSweep::new(3.0, -2.0).sweep(&profile, &cfg).unwrap();
        // x = (16 - j - 3) * dxy vanishes at j = 13, y = (16 - i + 2) * dxy at i = 18.
        assert!((shifted[[18, 13]] - profile.values()[0]).abs() < 1e-12);
        assert!(shifted[[18, 13]] > shifted[[18, 16]]);
    }

    #[test]
    fn rejects_invalid_geometry() {
        let profile = gaussian(0.2, 0.1, 10, 5.0);
        let err = LoopSweep::default()
            .sweep(&profile, &config(16, 16, 0.1, 0.0))
            .unwrap_err();
        assert!(matches!(err, KernelError::Precondition(_)));

        let profile = gaussian(0.0, 0.1, 10, 5.0);
        assert!(matches!(
            MeshSweep::default().sweep(&profile, &config(16, 16, 0.1, 90.0)),
            Err(KernelError::Degenerate(_))
        ));
        assert!(matches!(
            MeshSweep::default().sweep(&profile, &config(16, 16, 0.0, 0.0)),
            Err(KernelError::Degenerate(_))
        ));
        assert!(matches!(
            LoopSweep::default().sweep(&profile, &config(0, 16, 0.1, 0.0)),
            Err(KernelError::Precondition(_))
        ));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: SweepConfig = serde_json::from_str(r#"{"nrow": 64, "dxy": 0.5}"#).unwrap();
        assert_eq!(cfg.nrow, 64);
        assert_eq!(cfg.ncol, SweepConfig::default().ncol);
        assert_eq!(cfg.inclination_deg, 0.0);
        let sweep: LoopSweep = serde_json::from_str(r#"{"window": "full"}"#).unwrap();
        assert_eq!(sweep.window, SweepWindow::Full);
    }
}
