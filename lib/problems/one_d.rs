//! One-dimensional problems.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    config::{ OutputChoice, Params },
    grid::Coords,
    problem::Problem,
};

// Lennard-Jones 12-6 potential with unit depth and minimum at `s = 1`
fn lj(s: f64) -> f64 {
    4.0 * (s.powi(-12) - s.powi(-6))
}

// separation scale placing the minimum of `lj` at a distance `r0`
fn lj_sigma(r0: f64) -> f64 { r0 / 2.0_f64.powf(1.0 / 6.0) }

fn lennard_jones_params() -> Params {
    Params {
        nx: 600,
        ny: 600,
        xmax: 5.0,
        ymax: 5.0,
        dt: 0.001,
        tmax: 30.0,
        images: 300,
        absorb_coeff: 20.0,
        output_choice: OutputChoice::Both,
        fix_maximum: 1.25,
    }
}

/// Gaussian wavepacket released in a Lennard-Jones potential whose hard core
/// sits at the left edge of the window.
#[derive(Copy, Clone, Debug, Default)]
pub struct LennardJones;

impl Problem<nd::Ix1> for LennardJones {
    fn name(&self) -> &str { "lennard_jones" }

    fn params(&self) -> Params { lennard_jones_params() }

    fn initial_condition(&self, _params: &Params, coords: &Coords<nd::Ix1>)
        -> nd::Array1<C64>
    {
        coords.x.mapv(|x| C64::from((-2.0 * x.powi(2)).exp()))
    }

    fn potential(
        &self,
        params: &Params,
        coords: &Coords<nd::Ix1>,
        _t: f64,
        _psi: nd::ArrayView1<C64>,
    ) -> nd::Array1<f64>
    {
        // the offset keeps the core finite on the first grid point
        let sigma = lj_sigma(params.xmax);
        coords.x.mapv(|x| lj((x + params.xmax + 1e-12) / sigma))
    }
}

/// Gaussian wavepacket between two facing Lennard-Jones potentials, as along
/// a hydrogen bond.
///
/// The potential is shifted so that its minimum is zero.
#[derive(Copy, Clone, Debug, Default)]
pub struct DoubleLennardJones;

impl Problem<nd::Ix1> for DoubleLennardJones {
    fn name(&self) -> &str { "double_lennard_jones" }

    fn params(&self) -> Params { lennard_jones_params() }

    fn initial_condition(&self, params: &Params, coords: &Coords<nd::Ix1>)
        -> nd::Array1<C64>
    {
        let r0 = params.xmax / 2.0;
        coords.x.mapv(|x| {
            C64::from((-4.0 * (x - params.xmax + r0).powi(2)).exp())
        })
    }

    fn potential(
        &self,
        params: &Params,
        coords: &Coords<nd::Ix1>,
        _t: f64,
        _psi: nd::ArrayView1<C64>,
    ) -> nd::Array1<f64>
    {
        let sigma = lj_sigma(params.xmax / 2.0);
        let v: nd::Array1<f64>
            = coords.x.mapv(|x| {
                lj((x + params.xmax + 1e-12) / sigma)
                    + lj((params.xmax - x + 1e-12) / sigma)
            });
        let vmin = v.iter().copied().fold(f64::INFINITY, f64::min);
        v - vmin
    }
}

/// Displaced Gaussian in the harmonic trap `V = x²`.
///
/// Mostly useful for ground-state searches.
#[derive(Copy, Clone, Debug, Default)]
pub struct Harmonic;

impl Problem<nd::Ix1> for Harmonic {
    fn name(&self) -> &str { "harmonic" }

    fn params(&self) -> Params {
        Params {
            nx: 256,
            ny: 256,
            xmax: 8.0,
            ymax: 8.0,
            dt: 0.01,
            tmax: 20.0,
            images: 40,
            absorb_coeff: 0.0,
            output_choice: OutputChoice::Save,
            fix_maximum: 0.0,
        }
    }

    fn initial_condition(&self, _params: &Params, coords: &Coords<nd::Ix1>)
        -> nd::Array1<C64>
    {
        coords.x.mapv(|x| C64::from((-(x - 1.0).powi(2) / 2.0).exp()))
    }

    fn potential(
        &self,
        _params: &Params,
        coords: &Coords<nd::Ix1>,
        _t: f64,
        _psi: nd::ArrayView1<C64>,
    ) -> nd::Array1<f64>
    {
        coords.x.mapv(|x| x.powi(2))
    }
}

/// Moving Gaussian wavepacket in free space with periodic boundaries.
#[derive(Copy, Clone, Debug)]
pub struct FreeGaussian {
    /// Initial wavenumber.
    pub k0: f64,
}

impl Default for FreeGaussian {
    fn default() -> Self { Self { k0: 1.0 } }
}

impl Problem<nd::Ix1> for FreeGaussian {
    fn name(&self) -> &str { "free_gaussian" }

    fn params(&self) -> Params {
        Params {
            nx: 512,
            ny: 512,
            xmax: 20.0,
            ymax: 20.0,
            dt: 0.01,
            tmax: 5.0,
            images: 50,
            absorb_coeff: 0.0,
            output_choice: OutputChoice::Save,
            fix_maximum: 0.0,
        }
    }

    fn initial_condition(&self, _params: &Params, coords: &Coords<nd::Ix1>)
        -> nd::Array1<C64>
    {
        coords.x.mapv(|x| C64::cis(self.k0 * x) * (-x.powi(2) / 2.0).exp())
    }

    fn potential(
        &self,
        _params: &Params,
        coords: &Coords<nd::Ix1>,
        _t: f64,
        _psi: nd::ArrayView1<C64>,
    ) -> nd::Array1<f64>
    {
        nd::Array1::zeros(coords.x.raw_dim())
    }
}
