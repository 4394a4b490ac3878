//! Two-dimensional problems.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    config::{ OutputChoice, Params },
    grid::Coords,
    problem::Problem,
};

/// Parameters of a paraxial beam launched towards (or away from) its focus.
#[derive(Copy, Clone, Debug)]
pub struct Beam {
    /// Initial center.
    pub center: (f64, f64),
    /// Rayleigh range.
    pub z_r: f64,
    /// Initial position relative to the focus.
    pub z_ini: f64,
    /// Transverse velocity.
    pub velocity: (f64, f64),
}

impl Beam {
    // complex beam parameter
    fn q(&self) -> C64 { C64::new(self.z_r, 2.0 * self.z_ini) }

    fn offsets(&self, x: f64, y: f64) -> (f64, f64, f64) {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        (dx, dy, dx.hypot(dy))
    }

    fn tilt(&self, x: f64, y: f64) -> C64 {
        C64::cis(self.velocity.0 * x + self.velocity.1 * y)
    }

    /// Fundamental Gaussian beam.
    pub fn gaussian(&self, x: f64, y: f64) -> C64 {
        let q = self.q();
        let (_, _, r) = self.offsets(x, y);
        (2.0 * self.z_r / PI).sqrt() / q
            * (-r.powi(2) / q).exp()
            * self.tilt(x, y)
    }

    /// Charge-one vortex beam.
    pub fn vortex(&self, x: f64, y: f64) -> C64 {
        let q = self.q();
        let (dx, dy, r) = self.offsets(x, y);
        2.0 * self.z_r / PI.sqrt() / q.powi(2)
            * r
            * (-r.powi(2) / q).exp()
            * C64::cis(dy.atan2(dx))
            * self.tilt(x, y)
    }
}

/// A Gaussian beam and a vortex beam approaching each other in free space and
/// interfering as they cross.
#[derive(Copy, Clone, Debug)]
pub struct GaussianVortex {
    pub gaussian: Beam,
    pub vortex: Beam,
}

impl Default for GaussianVortex {
    fn default() -> Self {
        Self {
            gaussian: Beam {
                center: (-10.0, 0.0),
                z_r: 14.0,
                z_ini: -5.0,
                velocity: (2.5, 0.0),
            },
            vortex: Beam {
                center: (8.0, 0.0),
                z_r: 10.0,
                z_ini: -5.0,
                velocity: (-2.5, 0.0),
            },
        }
    }
}

impl Problem<nd::Ix2> for GaussianVortex {
    fn name(&self) -> &str { "gaussian_vortex" }

    fn params(&self) -> Params {
        Params {
            nx: 600,
            ny: 300,
            xmax: 30.0,
            ymax: 20.0,
            dt: 0.001,
            tmax: 7.0,
            images: 140,
            absorb_coeff: 0.0,
            output_choice: OutputChoice::Both,
            fix_maximum: 0.07,
        }
    }

    fn initial_condition(&self, _params: &Params, coords: &Coords<nd::Ix2>)
        -> nd::Array2<C64>
    {
        nd::Zip::from(&coords.x).and(&coords.y)
            .map_collect(|&x, &y| {
                self.gaussian.gaussian(x, y) + self.vortex.vortex(x, y)
            })
    }

    fn potential(
        &self,
        _params: &Params,
        coords: &Coords<nd::Ix2>,
        _t: f64,
        _psi: nd::ArrayView2<C64>,
    ) -> nd::Array2<f64>
    {
        nd::Array2::zeros(coords.x.raw_dim())
    }
}

/// Displaced Gaussian in the isotropic harmonic trap `V = x² + y²`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Harmonic2D;

impl Problem<nd::Ix2> for Harmonic2D {
    fn name(&self) -> &str { "harmonic" }

    fn params(&self) -> Params {
        Params {
            nx: 128,
            ny: 128,
            xmax: 8.0,
            ymax: 8.0,
            dt: 0.01,
            tmax: 10.0,
            images: 20,
            absorb_coeff: 0.0,
            output_choice: OutputChoice::Save,
            fix_maximum: 0.0,
        }
    }

    fn initial_condition(&self, _params: &Params, coords: &Coords<nd::Ix2>)
        -> nd::Array2<C64>
    {
        nd::Zip::from(&coords.x).and(&coords.y)
            .map_collect(|&x, &y| {
                C64::from((-((x - 1.0).powi(2) + (y + 0.5).powi(2)) / 2.0).exp())
            })
    }

    fn potential(
        &self,
        _params: &Params,
        coords: &Coords<nd::Ix2>,
        _t: f64,
        _psi: nd::ArrayView2<C64>,
    ) -> nd::Array2<f64>
    {
        nd::Zip::from(&coords.x).and(&coords.y)
            .map_collect(|&x, &y| x.powi(2) + y.powi(2))
    }
}
