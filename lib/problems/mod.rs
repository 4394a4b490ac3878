//! Ready-made problems and a registry to select them by name.
//!
//! ```
//! use fresnel::{ grid::Dimensionality, problems };
//!
//! let prob = problems::lookup("harmonic", Dimensionality::Two).unwrap();
//! assert_eq!(prob.dimensionality(), Dimensionality::Two);
//! assert!(problems::lookup("gaussian_vortex", Dimensionality::One).is_err());
//! ```

use ndarray as nd;
use crate::{
    config::{ Params, ParamsOverride },
    error::{ BpmResult, ConfigError },
    grid::{ Dimensionality, Grid1D, Grid2D },
    output::OutputSink,
    problem::Problem,
    propagate::{ self, Mode, RunControl, RunSummary },
};

pub mod one_d;
pub mod two_d;

pub use one_d::{ DoubleLennardJones, FreeGaussian, Harmonic, LennardJones };
pub use two_d::{ Beam, GaussianVortex, Harmonic2D };

/// Names of all registered one-dimensional problems.
pub const NAMES_1D: &[&str] = &[
    "lennard_jones",
    "double_lennard_jones",
    "harmonic",
    "free_gaussian",
];

/// Names of all registered two-dimensional problems.
pub const NAMES_2D: &[&str] = &[
    "gaussian_vortex",
    "harmonic",
];

/// A problem of either dimensionality.
pub enum AnyProblem {
    One(Box<dyn Problem<nd::Ix1>>),
    Two(Box<dyn Problem<nd::Ix2>>),
}

impl std::fmt::Debug for AnyProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnyProblem({} {:?})", self.dimensionality(), self.name())
    }
}

/// Look up a registered problem.
pub fn lookup(name: &str, dim: Dimensionality)
    -> Result<AnyProblem, ConfigError>
{
    let prob
        = match (dim, name) {
            (Dimensionality::One, "lennard_jones")
                => AnyProblem::One(Box::new(LennardJones)),
            (Dimensionality::One, "double_lennard_jones")
                => AnyProblem::One(Box::new(DoubleLennardJones)),
            (Dimensionality::One, "harmonic")
                => AnyProblem::One(Box::new(Harmonic)),
            (Dimensionality::One, "free_gaussian")
                => AnyProblem::One(Box::new(FreeGaussian::default())),
            (Dimensionality::Two, "gaussian_vortex")
                => AnyProblem::Two(Box::new(GaussianVortex::default())),
            (Dimensionality::Two, "harmonic")
                => AnyProblem::Two(Box::new(Harmonic2D)),
            _ => {
                return Err(ConfigError::UnknownExample(name.to_string(), dim));
            },
        };
    Ok(prob)
}

impl AnyProblem {
    /// Get the dimensionality of the problem.
    pub fn dimensionality(&self) -> Dimensionality {
        match self {
            Self::One(_) => Dimensionality::One,
            Self::Two(_) => Dimensionality::Two,
        }
    }

    /// Get the name of the problem.
    pub fn name(&self) -> &str {
        match self {
            Self::One(prob) => prob.name(),
            Self::Two(prob) => prob.name(),
        }
    }

    /// Get the problem's default parameters.
    pub fn params(&self) -> Params {
        match self {
            Self::One(prob) => prob.params(),
            Self::Two(prob) => prob.params(),
        }
    }

    /// Build the appropriate grid and run the problem with its default
    /// parameters, amended by `overrides`.
    pub fn run<O>(
        &self,
        overrides: &ParamsOverride,
        mode: Mode,
        sink: &mut O,
        control: &RunControl,
    ) -> BpmResult<RunSummary>
    where O: OutputSink<nd::Ix1> + OutputSink<nd::Ix2>
    {
        let params = overrides.apply(self.params());
        match self {
            Self::One(prob) => {
                params.validate(false)?;
                let grid = Grid1D::from_params(&params)?;
                propagate::run_with_control(
                    &grid, &**prob, &params, mode, sink, control)
            },
            Self::Two(prob) => {
                params.validate(true)?;
                let grid = Grid2D::from_params(&params)?;
                propagate::run_with_control(
                    &grid, &**prob, &params, mode, sink, control)
            },
        }
    }
}
