//! Description of a single physical scenario: run parameters, an initial
//! wavefunction, and a potential.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ config::Params, grid::Coords };

/// A physical scenario to propagate on a grid of dimension `D`.
///
/// Both the initial condition and the potential receive the parameters the
/// run was actually set up with, which may differ from [`Self::params`] if
/// they were overridden.
pub trait Problem<D: nd::Dimension> {
    /// Short identifier, also used to name output directories.
    fn name(&self) -> &str;

    /// Default run parameters.
    fn params(&self) -> Params;

    /// Initial wavefunction; must have the grid's shape.
    fn initial_condition(&self, params: &Params, coords: &Coords<D>)
        -> nd::Array<C64, D>;

    /// Potential at time `t`, given the current wavefunction; must have the
    /// grid's shape.
    fn potential(
        &self,
        params: &Params,
        coords: &Coords<D>,
        t: f64,
        psi: nd::ArrayView<C64, D>,
    ) -> nd::Array<f64, D>;
}

impl<D, P> Problem<D> for Box<P>
where
    D: nd::Dimension,
    P: Problem<D> + ?Sized,
{
    fn name(&self) -> &str { (**self).name() }

    fn params(&self) -> Params { (**self).params() }

    fn initial_condition(&self, params: &Params, coords: &Coords<D>)
        -> nd::Array<C64, D>
    {
        (**self).initial_condition(params, coords)
    }

    fn potential(
        &self,
        params: &Params,
        coords: &Coords<D>,
        t: f64,
        psi: nd::ArrayView<C64, D>,
    ) -> nd::Array<f64, D>
    {
        (**self).potential(params, coords, t, psi)
    }
}
