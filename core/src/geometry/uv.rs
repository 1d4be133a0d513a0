use crate::prelude::{ensure_positive, KernelError, KernelResult, Real};
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

/// Paired Fourier-plane coordinates, in units of the observing wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct UvCoordinates<T: Real> {
    u: Array1<T>,
    v: Array1<T>,
}

impl<T: Real> UvCoordinates<T> {
    pub fn new(u: Array1<T>, v: Array1<T>) -> KernelResult<Self> {
        if u.len() != v.len() {
            return Err(KernelError::InvalidInput(format!(
                "u has {} samples but v has {}",
                u.len(),
                v.len()
            )));
        }
        Ok(Self { u, v })
    }

    pub fn u(&self) -> ArrayView1<'_, T> {
        self.u.view()
    }

    pub fn v(&self) -> ArrayView1<'_, T> {
        self.v.view()
    }

    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }
}

/// Continuous pixel indices: `x` runs along columns (u), `y` along rows (v).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelIndices<T: Real> {
    pub x: Array1<T>,
    pub y: Array1<T>,
}

/// Storage layout of the transform being sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FourierLayout {
    /// Full complex plane, zero frequency at `half_size` on both axes.
    #[default]
    C2c,
    /// Hermitian half plane: only `u >= 0` is stored.
    R2c,
}

/// Converts (u, v) coordinates into pixel indices of a square Fourier grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvMapper<T: Real> {
    du: T,
    half_size: T,
    layout: FourierLayout,
}

impl<T: Real> UvMapper<T> {
    pub fn new(du: T, half_size: T, layout: FourierLayout) -> KernelResult<Self> {
        ensure_positive(du.to_f64().unwrap_or(f64::NAN), "du")?;
        if !half_size.is_finite() {
            return Err(KernelError::InvalidInput(format!(
                "half size must be finite, got {:?}",
                half_size
            )));
        }
        Ok(Self {
            du,
            half_size,
            layout,
        })
    }

    /// Mapper for an `nx`-pixel grid spanning `maxuv`, centred at `nx / 2`.
    pub fn for_grid(nx: usize, maxuv: T, layout: FourierLayout) -> KernelResult<Self> {
        if nx == 0 {
            return Err(KernelError::Precondition("grid size must be non-zero".into()));
        }
        Self::new(
            maxuv / T::from_index(nx),
            T::from_index(nx) / T::from_real(2.0),
            layout,
        )
    }

    pub fn layout(&self) -> FourierLayout {
        self.layout
    }

    pub fn map(&self, u: T, v: T) -> (T, T) {
        match self.layout {
            FourierLayout::C2c => (self.half_size + u / self.du, self.half_size + v / self.du),
            FourierLayout::R2c => {
                let x = u.abs() / self.du;
                let y = if u < T::zero() {
                    self.half_size - v / self.du
                } else {
                    self.half_size + v / self.du
                };
                (x, y)
            }
        }
    }

    pub fn map_all(&self, uv: &UvCoordinates<T>) -> PixelIndices<T> {
        let (x, y): (Vec<T>, Vec<T>) = uv
            .u()
            .iter()
            .zip(uv.v().iter())
            .map(|(&u, &v)| self.map(u, v))
            .unzip();
        PixelIndices {
            x: Array1::from(x),
            y: Array1::from(y),
        }
    }
}

/// Physical u coordinate of every pixel centre: `(k - nx/2) * maxuv / nx`.
pub fn pixel_coordinates<T: Real>(maxuv: T, nx: usize) -> Array1<T> {
    let half = T::from_index(nx) / T::from_real(2.0);
    let scale = maxuv / T::from_index(nx);
    Array1::from_shape_fn(nx, |k| (T::from_index(k) - half) * scale)
}

/// Sample frequencies of an `n`-point transform in centred order, i.e. the
/// shifted `k / n` sequence running from `-(n/2)/n` upwards.
pub fn centered_frequencies<T: Real>(n: usize) -> Array1<T> {
    let centre = T::from_index(n / 2);
    let len = T::from_index(n);
    Array1::from_shape_fn(n, |k| (T::from_index(k) - centre) / len)
}

/// Multiplies every element by `scale`, in parallel.
pub(crate) fn scaled<T: Real>(values: ArrayView1<'_, T>, scale: T) -> Array1<T> {
    Zip::from(values).par_map_collect(|&value| value * scale)
}
