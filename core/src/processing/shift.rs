use crate::geometry::uv::{centered_frequencies, scaled, UvCoordinates};
use crate::prelude::{ensure_finite, ensure_positive, KernelError, KernelResult, Real, SEC2RAD};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Real-space translation, in arcseconds, applied as a Fourier phase ramp
/// `exp(i (u x0 + v y0))`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseShift {
    pub x0_arcsec: f64,
    pub y0_arcsec: f64,
}

/// Extent of a centred square transform grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FourierGrid {
    /// Full uv span covered by the grid, in the same length unit as `wavelength`.
    pub maxuv: f64,
    pub wavelength: f64,
}

impl Default for FourierGrid {
    fn default() -> Self {
        Self {
            maxuv: 1.0,
            wavelength: 1.0,
        }
    }
}

impl PhaseShift {
    pub fn new(x0_arcsec: f64, y0_arcsec: f64) -> Self {
        Self {
            x0_arcsec,
            y0_arcsec,
        }
    }

    /// The shift that undoes this one.
    pub fn inverse(&self) -> Self {
        Self::new(-self.x0_arcsec, -self.y0_arcsec)
    }

    fn validate(&self) -> KernelResult<()> {
        ensure_finite(self.x0_arcsec, "x0")?;
        ensure_finite(self.y0_arcsec, "y0")
    }

    /// Shifts a centred transform in place.
    ///
    /// Row `i` and column `j` sit at frequencies `v[i]` and `u[j]` taken from
    /// the centred sequence `maxuv * 2 pi * (k - nx/2) / nx`; the offsets are
    /// converted to inverse-uv units through `SEC2RAD / wavelength`.
    pub fn apply_to_grid<T: Real>(
        &self,
        grid: &mut Array2<Complex<T>>,
        fourier: &FourierGrid,
    ) -> KernelResult<()> {
        self.validate()?;
        ensure_positive(fourier.maxuv, "maxuv")?;
        ensure_positive(fourier.wavelength, "wavelength")?;
        let (rows, cols) = grid.dim();
        if rows != cols || rows == 0 {
            return Err(KernelError::InvalidInput(format!(
                "grid phase shift needs a non-empty square grid, got {}x{}",
                rows, cols
            )));
        }
        log::debug!(
            "grid phase shift {}x{} by ({}, {}) arcsec",
            rows,
            cols,
            self.x0_arcsec,
            self.y0_arcsec
        );

        let sec2pixel = SEC2RAD / fourier.wavelength;
        let x0 = T::from_real(self.x0_arcsec * sec2pixel);
        let y0 = T::from_real(self.y0_arcsec * sec2pixel);

        let freq = scaled(
            centered_frequencies::<T>(rows).view(),
            T::from_real(fourier.maxuv) * T::from_real(2.0) * T::PI(),
        );
        let ux = scaled(freq.view(), x0);
        let vy = scaled(freq.view(), y0);

        Zip::indexed(grid).par_for_each(|(i, j), value| {
            let (sin_theta, cos_theta) = (ux[j] + vy[i]).sin_cos();
            let (re, im) = (value.re, value.im);
            value.re = re * cos_theta - im * sin_theta;
            value.im = im * cos_theta + re * sin_theta;
        });

        Ok(())
    }

    /// Allocating variant of [`PhaseShift::apply_to_grid`].
    pub fn shifted_grid<T: Real>(
        &self,
        grid: ArrayView2<'_, Complex<T>>,
        fourier: &FourierGrid,
    ) -> KernelResult<Array2<Complex<T>>> {
        let mut shifted = grid.to_owned();
        self.apply_to_grid(&mut shifted, fourier)?;
        Ok(shifted)
    }

    /// Shifts visibilities sampled at `(u, v)`, given in wavelengths.
    pub fn apply_to_points<T: Real>(
        &self,
        uv: &UvCoordinates<T>,
        vis: ArrayView1<'_, Complex<T>>,
    ) -> KernelResult<Array1<Complex<T>>> {
        self.validate()?;
        if vis.len() != uv.len() {
            return Err(KernelError::InvalidInput(format!(
                "{} visibilities for {} uv points",
                vis.len(),
                uv.len()
            )));
        }
        log::debug!(
            "point phase shift of {} samples by ({}, {}) arcsec",
            vis.len(),
            self.x0_arcsec,
            self.y0_arcsec
        );

        let two_pi = 2.0 * std::f64::consts::PI;
        let x0 = T::from_real(self.x0_arcsec * SEC2RAD * two_pi);
        let y0 = T::from_real(self.y0_arcsec * SEC2RAD * two_pi);

        Ok(Zip::from(uv.u())
            .and(uv.v())
            .and(vis)
            .par_map_collect(|&u, &v, &f| {
                let (sin_theta, cos_theta) = (u * x0 + v * y0).sin_cos();
                f * Complex::new(cos_theta, sin_theta)
            }))
    }
}
