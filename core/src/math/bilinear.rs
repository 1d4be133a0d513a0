use crate::prelude::{KernelError, KernelResult, Real};
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};
use std::ops::{Add, Mul, Sub};

/// Values that can be blended with real weights: real pixels or complex
/// Fourier samples.
pub trait Blend<T>:
    Copy + Send + Sync + Add<Output = Self> + Sub<Output = Self> + Mul<T, Output = Self>
{
}

impl<T, V> Blend<T> for V where
    V: Copy + Send + Sync + Add<Output = V> + Sub<Output = V> + Mul<T, Output = V>
{
}

/// Samples a grid at fractional pixel coordinates. `x` indexes columns and
/// `y` indexes rows; integer coordinates land on pixel centres.
pub struct BilinearSampler;

impl BilinearSampler {
    /// Interpolates one value per `(x, y)` pair, preserving input order.
    ///
    /// Every sample needs its full 2x2 neighbourhood inside the grid, so
    /// `floor(x) + 1 < cols` and `floor(y) + 1 < rows`.
    pub fn sample<T, V>(
        grid: ArrayView2<'_, V>,
        x: ArrayView1<'_, T>,
        y: ArrayView1<'_, T>,
    ) -> KernelResult<Array1<V>>
    where
        T: Real,
        V: Blend<T>,
    {
        if x.len() != y.len() {
            return Err(KernelError::InvalidInput(format!(
                "x has {} coordinates but y has {}",
                x.len(),
                y.len()
            )));
        }

        let (rows, cols) = grid.dim();
        for (index, (&xs, &ys)) in x.iter().zip(y.iter()).enumerate() {
            if Self::cell(xs, cols).is_none() || Self::cell(ys, rows).is_none() {
                return Err(KernelError::OutOfRange {
                    index,
                    x: xs.to_f64().unwrap_or(f64::NAN),
                    y: ys.to_f64().unwrap_or(f64::NAN),
                    rows,
                    cols,
                });
            }
        }

        log::trace!("bilinear sampling {} points on {}x{}", x.len(), rows, cols);

        Ok(Zip::from(x)
            .and(y)
            .par_map_collect(|&xs, &ys| Self::blend(&grid, xs, ys)))
    }

    /// Single-point variant of [`BilinearSampler::sample`].
    pub fn sample_at<T, V>(grid: ArrayView2<'_, V>, x: T, y: T) -> KernelResult<V>
    where
        T: Real,
        V: Blend<T>,
    {
        let (rows, cols) = grid.dim();
        if Self::cell(x, cols).is_none() || Self::cell(y, rows).is_none() {
            return Err(KernelError::OutOfRange {
                index: 0,
                x: x.to_f64().unwrap_or(f64::NAN),
                y: y.to_f64().unwrap_or(f64::NAN),
                rows,
                cols,
            });
        }
        Ok(Self::blend(&grid, x, y))
    }

    /// Lower cell index along an axis of length `len`, if the cell fits.
    fn cell<T: Real>(coord: T, len: usize) -> Option<usize> {
        if !coord.is_finite() || coord < T::zero() {
            return None;
        }
        let lower = coord.floor().to_usize()?;
        (lower + 1 < len).then_some(lower)
    }

    fn blend<T, V>(grid: &ArrayView2<'_, V>, x: T, y: T) -> V
    where
        T: Real,
        V: Blend<T>,
    {
        let x0 = x.floor();
        let y0 = y.floor();
        let u = x - x0;
        let t = y - y0;
        // Coordinates were validated, so the casts cannot fail.
        let col = x0.to_usize().unwrap_or_default();
        let row = y0.to_usize().unwrap_or_default();

        let f00 = grid[[row, col]];
        let f10 = grid[[row + 1, col]];
        let f11 = grid[[row + 1, col + 1]];
        let f01 = grid[[row, col + 1]];

        (f00 - f10 + f11 - f01) * (t * u) + (f10 - f00) * t + (f01 - f00) * u + f00
    }
}
