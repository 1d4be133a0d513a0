use crate::prelude::{ensure_finite, ensure_positive, KernelError, KernelResult, Real};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Orientation of the axes of a reference image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisOrientation {
    /// Both axes flipped, matching sky orientation (east left, north up).
    #[default]
    Corrected,
    /// Only the x axis flipped.
    ReversedX,
    /// Axes increase with pixel index.
    Native,
}

/// Elliptical Gaussian test image on a unit-pixel grid centred at `size / 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceImage {
    /// Number of columns, and of rows unless `size_y` is set.
    pub size: usize,
    pub size_y: Option<usize>,
    pub x0: f64,
    pub y0: f64,
    pub sigma_x: f64,
    pub sigma_y: f64,
    pub axes: AxisOrientation,
}

impl Default for ReferenceImage {
    fn default() -> Self {
        Self {
            size: 256,
            size_y: None,
            x0: 10.0,
            y0: -3.0,
            sigma_x: 50.0,
            sigma_y: 30.0,
            axes: AxisOrientation::Corrected,
        }
    }
}

impl ReferenceImage {
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    fn axis<T: Real>(len: usize) -> Array1<T> {
        let half = T::from_index(len) / T::from_real(2.0);
        Array1::from_shape_fn(len, |k| T::from_index(k) - half)
    }

    /// Renders `exp(-(x - x0)^2 / sigma_x - (y - y0)^2 / sigma_y)`.
    pub fn render<T: Real>(&self) -> KernelResult<Array2<T>> {
        let rows = self.size_y.unwrap_or(self.size);
        if self.size == 0 || rows == 0 {
            return Err(KernelError::Precondition(format!(
                "reference image must be non-empty, got {}x{}",
                rows, self.size
            )));
        }
        ensure_finite(self.x0, "x0")?;
        ensure_finite(self.y0, "y0")?;
        ensure_positive(self.sigma_x, "sigma_x")?;
        ensure_positive(self.sigma_y, "sigma_y")?;

        let (flip_x, flip_y) = match self.axes {
            AxisOrientation::Corrected => (true, true),
            AxisOrientation::ReversedX => (true, false),
            AxisOrientation::Native => (false, false),
        };
        let orient = |axis: Array1<T>, flip: bool| if flip { axis.mapv(|c| -c) } else { axis };
        let xs = orient(Self::axis(self.size), flip_x);
        let ys = orient(Self::axis(rows), flip_y);

        let (x0, y0) = (T::from_real(self.x0), T::from_real(self.y0));
        let (sigma_x, sigma_y) = (T::from_real(self.sigma_x), T::from_real(self.sigma_y));
        Ok(Array2::from_shape_fn((rows, self.size), |(i, j)| {
            let dx = xs[j] - x0;
            let dy = ys[i] - y0;
            (-(dx * dx) / sigma_x - dy * dy / sigma_y).exp()
        }))
    }
}
