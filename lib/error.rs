//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use thiserror::Error;

/// Returned when a run is set up with bad parameters.
///
/// All of these are raised before the first propagation step is taken.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when a dimensionality other than `1D` or `2D` is requested.
    #[error("unsupported dimensionality {0:?}; expected \"1D\" or \"2D\"")]
    Dimensionality(String),

    /// Returned when no problem is registered under a name.
    #[error("no {1} example named {0:?}")]
    UnknownExample(String, crate::grid::Dimensionality),

    /// Returned when a grid size is zero.
    #[error("{0} must be greater than 0")]
    ZeroSize(&'static str),

    /// Returned when a length or time parameter is non-positive or non-finite.
    #[error("{0} must be positive and finite; got {1}")]
    NonPositive(&'static str, f64),

    /// Returned when the absorption coefficient is negative or non-finite.
    #[error("absorb_coeff must be non-negative; got {0}")]
    BadAbsorption(f64),

    /// Returned when `tmax` is too short to take at least one step per image.
    #[error(
        "tmax = {tmax} is too short for {images} images at dt = {dt}; need at \
        least one step per image"
    )]
    TooFewSteps { tmax: f64, dt: f64, images: usize },

    /// Returned when a problem produces an array that doesn't match the grid.
    #[error("{what} has shape {got:?}; expected {expected:?}")]
    Shape {
        what: &'static str,
        got: Vec<usize>,
        expected: Vec<usize>,
    },

    /// Returned when the initial wavefunction has zero (or non-finite) norm.
    #[error("initial wavefunction has norm {0}; cannot renormalize against it")]
    ZeroNorm(f64),

    /// Returned when an output choice integer is not 1, 2, or 3.
    #[error("output_choice must be 1, 2, or 3; got {0}")]
    OutputChoice(u8),

    /// Returned when a parameter file can't be read.
    #[error("unable to read parameter file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Returned when a parameter file can't be parsed.
    #[error("unable to parse parameters: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn check_size(name: &'static str, n: usize) -> Result<(), Self> {
        (n != 0).then_some(()).ok_or(Self::ZeroSize(name))
    }

    pub(crate) fn check_positive(name: &'static str, val: f64)
        -> Result<(), Self>
    {
        (val > 0.0 && val.is_finite()).then_some(())
            .ok_or(Self::NonPositive(name, val))
    }

    pub(crate) fn check_shape(
        what: &'static str,
        got: &[usize],
        expected: &[usize],
    ) -> Result<(), Self>
    {
        (got == expected).then_some(())
            .ok_or_else(|| {
                Self::Shape {
                    what,
                    got: got.to_vec(),
                    expected: expected.to_vec(),
                }
            })
    }
}

/// Returned from [output sinks][crate::output].
#[derive(Debug, Error)]
pub enum OutputError {
    /// [`std::io::Error`]
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// [`ndarray_npy::WriteNpyError`]
    #[error("npy write error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    /// [`toml::ser::Error`]
    #[error("toml write error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Returned from the propagation engine.
#[derive(Debug, Error)]
pub enum BpmError {
    /// [`ConfigError`]
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Returned when the potential evaluated at some step doesn't match the
    /// grid.
    #[error("potential at step {step} has shape {got:?}; expected {expected:?}")]
    Shape {
        step: usize,
        got: Vec<usize>,
        expected: Vec<usize>,
    },

    /// Returned when the wavefunction norm collapses to zero (or overflows)
    /// during a step, so that renormalization is impossible.
    #[error("wavefunction norm degenerated to {norm} at step {step}")]
    Degenerate { step: usize, norm: f64 },

    /// Returned when a run is stopped through its
    /// [`RunControl`][crate::propagate::RunControl].
    #[error("run cancelled before step {0}")]
    Cancelled(usize),

    /// [`OutputError`]
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

impl BpmError {
    pub(crate) fn check_norm(step: usize, norm: f64) -> Result<f64, Self> {
        (norm > 0.0 && norm.is_finite()).then_some(norm)
            .ok_or(Self::Degenerate { step, norm })
    }
}

pub type BpmResult<T> = Result<T, BpmError>;
