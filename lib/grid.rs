//! Spatial grids, frequency-space Laplacians, and absorbing masks for one- and
//! two-dimensional periodic computational windows.
//!
//! A grid of `n` points over the half-width `xmax` covers `[-xmax, xmax)` with
//! spacing `2 xmax / n`; the right edge is identified with the left.

use std::{ f64::consts::TAU, fmt, str::FromStr };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    config::Params,
    error::ConfigError,
    fourier::{ Fft1, Fft2, Transform },
    utils::fft_freq_centered,
};

/// Number of spatial dimensions of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    /// 1+1D propagation.
    One,
    /// 1+2D propagation.
    Two,
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1D"),
            Self::Two => write!(f, "2D"),
        }
    }
}

impl FromStr for Dimensionality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "1D" => Ok(Self::One),
            "2D" => Ok(Self::Two),
            _ => Err(ConfigError::Dimensionality(s.to_string())),
        }
    }
}

/// Coordinate arrays over a grid.
///
/// Both arrays have the grid's shape. In one dimension, `y` is identically
/// zero.
#[derive(Clone, Debug)]
pub struct Coords<D: nd::Dimension> {
    pub x: nd::Array<f64, D>,
    pub y: nd::Array<f64, D>,
}

/// Builder of all grid-dependent operators for a particular dimensionality.
pub trait GridProvider {
    /// Array dimension of wavefunctions on this grid.
    type Dim: nd::Dimension;
    /// Fourier transform appropriate to the grid.
    type Transform: Transform<Self::Dim>;

    /// The dimensionality this provider handles.
    fn dimensionality(&self) -> Dimensionality;

    /// Shape of every array on the grid.
    fn shape(&self) -> Self::Dim;

    /// Spatial coordinate arrays.
    fn coords(&self) -> &Coords<Self::Dim>;

    /// Eigenvalues of the Laplacian in frequency space, in centered
    /// (monotonically increasing frequency) ordering.
    fn laplacian(&self) -> nd::Array<f64, Self::Dim>;

    /// Real-space damping mask for one time step `dt`, with values in
    /// `(0, 1]`.
    ///
    /// `absorb_coeff = 0` gives an identity mask.
    fn absorbing_mask(&self, dt: f64, absorb_coeff: f64)
        -> nd::Array<f64, Self::Dim>;

    /// One-dimensional summary of `|ψ|²` recorded once per frame.
    fn reduce_frame(&self, psi: nd::ArrayView<C64, Self::Dim>)
        -> nd::Array1<f64>;

    /// Length of the vectors returned by [`Self::reduce_frame`].
    fn frame_len(&self) -> usize;

    /// Plan a Fourier transform for arrays on the grid.
    fn transform(&self) -> Self::Transform;
}

fn periodic_axis(n: usize, xmax: f64) -> nd::Array1<f64> {
    let dx = 2.0 * xmax / n as f64;
    (0..n).map(|k| -xmax + k as f64 * dx).collect()
}

// angular wavenumbers, centered
fn wavenumbers(n: usize, xmax: f64) -> nd::Array1<f64> {
    fft_freq_centered(n, 2.0 * xmax / n as f64).mapv(|f| TAU * f)
}

// smooth absorbing profile along one axis; ~0 in the interior, ~1 at either
// edge, with width `xmax / 20`
fn shell(x: f64, xmax: f64) -> f64 {
    let w = xmax / 20.0;
    2.0 - ((x + xmax) / w).tanh() + ((x - xmax) / w).tanh()
}

/// Grid over a one-dimensional window.
#[derive(Clone, Debug)]
pub struct Grid1D {
    nx: usize,
    xmax: f64,
    coords: Coords<nd::Ix1>,
}

impl Grid1D {
    /// Create a new grid of `nx` points over `[-xmax, xmax)`.
    pub fn new(nx: usize, xmax: f64) -> Result<Self, ConfigError> {
        ConfigError::check_size("nx", nx)?;
        ConfigError::check_positive("xmax", xmax)?;
        let x = periodic_axis(nx, xmax);
        let y = nd::Array1::zeros(nx);
        Ok(Self { nx, xmax, coords: Coords { x, y } })
    }

    /// Create a new grid from the relevant fields of a [`Params`].
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        Self::new(params.nx, params.xmax)
    }

    /// Get the grid spacing.
    pub fn dx(&self) -> f64 { 2.0 * self.xmax / self.nx as f64 }
}

impl GridProvider for Grid1D {
    type Dim = nd::Ix1;
    type Transform = Fft1;

    fn dimensionality(&self) -> Dimensionality { Dimensionality::One }

    fn shape(&self) -> nd::Ix1 { nd::Ix1(self.nx) }

    fn coords(&self) -> &Coords<nd::Ix1> { &self.coords }

    fn laplacian(&self) -> nd::Array1<f64> {
        wavenumbers(self.nx, self.xmax).mapv(|k| -k.powi(2))
    }

    fn absorbing_mask(&self, dt: f64, absorb_coeff: f64) -> nd::Array1<f64> {
        self.coords.x.mapv(|x| (-absorb_coeff * shell(x, self.xmax) * dt).exp())
    }

    fn reduce_frame(&self, psi: nd::ArrayView1<C64>) -> nd::Array1<f64> {
        psi.mapv(|q| q.norm_sqr())
    }

    fn frame_len(&self) -> usize { self.nx }

    fn transform(&self) -> Fft1 { Fft1::new(self.nx) }
}

/// Grid over a two-dimensional window.
///
/// Arrays have shape `(ny, nx)`: the first axis indexes `y` and the second
/// indexes `x`.
#[derive(Clone, Debug)]
pub struct Grid2D {
    nx: usize,
    ny: usize,
    xmax: f64,
    ymax: f64,
    coords: Coords<nd::Ix2>,
}

impl Grid2D {
    /// Create a new grid of `ny × nx` points over `[-xmax, xmax) × [-ymax,
    /// ymax)`.
    pub fn new(nx: usize, ny: usize, xmax: f64, ymax: f64)
        -> Result<Self, ConfigError>
    {
        ConfigError::check_size("nx", nx)?;
        ConfigError::check_size("ny", ny)?;
        ConfigError::check_positive("xmax", xmax)?;
        ConfigError::check_positive("ymax", ymax)?;
        let xs = periodic_axis(nx, xmax);
        let ys = periodic_axis(ny, ymax);
        let x = nd::Array2::from_shape_fn((ny, nx), |(_, j)| xs[j]);
        let y = nd::Array2::from_shape_fn((ny, nx), |(i, _)| ys[i]);
        Ok(Self { nx, ny, xmax, ymax, coords: Coords { x, y } })
    }

    /// Create a new grid from the relevant fields of a [`Params`].
    pub fn from_params(params: &Params) -> Result<Self, ConfigError> {
        Self::new(params.nx, params.ny, params.xmax, params.ymax)
    }
}

impl GridProvider for Grid2D {
    type Dim = nd::Ix2;
    type Transform = Fft2;

    fn dimensionality(&self) -> Dimensionality { Dimensionality::Two }

    fn shape(&self) -> nd::Ix2 { nd::Ix2(self.ny, self.nx) }

    fn coords(&self) -> &Coords<nd::Ix2> { &self.coords }

    fn laplacian(&self) -> nd::Array2<f64> {
        let kx = wavenumbers(self.nx, self.xmax);
        let ky = wavenumbers(self.ny, self.ymax);
        nd::Array2::from_shape_fn(
            (self.ny, self.nx),
            |(i, j)| -(kx[j].powi(2) + ky[i].powi(2)),
        )
    }

    fn absorbing_mask(&self, dt: f64, absorb_coeff: f64) -> nd::Array2<f64> {
        nd::Zip::from(&self.coords.x).and(&self.coords.y)
            .map_collect(|&x, &y| {
                let s = shell(x, self.xmax) + shell(y, self.ymax);
                (-absorb_coeff * s * dt).exp()
            })
    }

    fn reduce_frame(&self, psi: nd::ArrayView2<C64>) -> nd::Array1<f64> {
        psi.row(self.ny / 2).mapv(|q| q.norm_sqr())
    }

    fn frame_len(&self) -> usize { self.nx }

    fn transform(&self) -> Fft2 { Fft2::new(self.ny, self.nx) }
}
