//! Scalar run parameters and their validation.
//!
//! Every [problem][crate::problem::Problem] carries a default [`Params`];
//! values can be overridden from TOML text through [`ParamsOverride`]:
//! ```
//! use fresnel::config::{ Params, ParamsOverride, OutputChoice };
//!
//! let defaults = Params {
//!     nx: 512, ny: 512, xmax: 5.0, ymax: 5.0, dt: 1e-3, tmax: 1.0,
//!     images: 10, absorb_coeff: 0.0, output_choice: OutputChoice::Save,
//!     fix_maximum: 0.0,
//! };
//! let over = ParamsOverride::from_toml_str("dt = 2e-3\nimages = 5").unwrap();
//! let params = over.apply(defaults);
//! assert_eq!(params.images, 5);
//! assert_eq!(params.steps_per_image().unwrap(), 100);
//! ```

use std::path::Path;
use serde::{ Deserialize, Serialize };
use tracing::warn;
use crate::error::ConfigError;

/// Selects which kinds of output a run produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OutputChoice {
    /// Report frames on screen only; nothing is written to disk.
    Display,
    /// Write frames to disk only.
    Save,
    /// Both of the above.
    Both,
}

impl OutputChoice {
    /// Return `true` if frames should be reported on screen.
    pub fn displays(self) -> bool { matches!(self, Self::Display | Self::Both) }

    /// Return `true` if frames should be written to disk.
    pub fn saves(self) -> bool { matches!(self, Self::Save | Self::Both) }
}

impl TryFrom<u8> for OutputChoice {
    type Error = ConfigError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Display),
            2 => Ok(Self::Save),
            3 => Ok(Self::Both),
            _ => Err(ConfigError::OutputChoice(n)),
        }
    }
}

impl From<OutputChoice> for u8 {
    fn from(choice: OutputChoice) -> Self {
        match choice {
            OutputChoice::Display => 1,
            OutputChoice::Save => 2,
            OutputChoice::Both => 3,
        }
    }
}

/// Scalar parameters of a single run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Number of grid points along x.
    pub nx: usize,
    /// Number of grid points along y (ignored in 1D).
    pub ny: usize,
    /// Half-width of the window along x.
    pub xmax: f64,
    /// Half-width of the window along y (ignored in 1D).
    pub ymax: f64,
    /// Time step.
    pub dt: f64,
    /// Total propagation time.
    pub tmax: f64,
    /// Number of frames recorded after the initial one.
    pub images: usize,
    /// Strength of the absorbing shell; 0 gives periodic boundaries.
    pub absorb_coeff: f64,
    /// Which kinds of output to produce.
    pub output_choice: OutputChoice,
    /// Fixed upper bound of the `|ψ|²` display scale; 0 leaves it free.
    pub fix_maximum: f64,
}

impl Params {
    /// Check that all parameters describe a runnable configuration.
    ///
    /// `ny` and `ymax` are only checked if `two_dim` is `true`.
    pub fn validate(&self, two_dim: bool) -> Result<(), ConfigError> {
        ConfigError::check_size("nx", self.nx)?;
        ConfigError::check_positive("xmax", self.xmax)?;
        if two_dim {
            ConfigError::check_size("ny", self.ny)?;
            ConfigError::check_positive("ymax", self.ymax)?;
        }
        ConfigError::check_positive("dt", self.dt)?;
        ConfigError::check_positive("tmax", self.tmax)?;
        ConfigError::check_size("images", self.images)?;
        if !(self.absorb_coeff >= 0.0 && self.absorb_coeff.is_finite()) {
            return Err(ConfigError::BadAbsorption(self.absorb_coeff));
        }
        self.steps_per_image().map(|_| ())
    }

    /// Number of time steps between consecutive frames,
    /// `round(tmax / dt / images)`.
    pub fn steps_per_image(&self) -> Result<usize, ConfigError> {
        let exact = self.tmax / self.dt / self.images as f64;
        let steps = exact.round();
        if !(steps >= 1.0 && steps.is_finite()) {
            return Err(ConfigError::TooFewSteps {
                tmax: self.tmax,
                dt: self.dt,
                images: self.images,
            });
        }
        if (steps - exact).abs() > 1e-6 * exact {
            warn!(
                exact,
                rounded = steps,
                "tmax / dt / images is not an integer; rounding steps per image"
            );
        }
        Ok(steps as usize)
    }

    /// Total number of time steps taken, `steps_per_image × images`.
    pub fn total_steps(&self) -> Result<usize, ConfigError> {
        Ok(self.steps_per_image()? * self.images)
    }

    /// Time elapsed between consecutive frames.
    pub fn frame_dt(&self) -> Result<f64, ConfigError> {
        Ok(self.steps_per_image()? as f64 * self.dt)
    }
}

/// Partial set of [`Params`], with every field optional.
///
/// Usually read from a TOML file and applied over a problem's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsOverride {
    pub nx: Option<usize>,
    pub ny: Option<usize>,
    pub xmax: Option<f64>,
    pub ymax: Option<f64>,
    pub dt: Option<f64>,
    pub tmax: Option<f64>,
    pub images: Option<usize>,
    pub absorb_coeff: Option<f64>,
    pub output_choice: Option<OutputChoice>,
    pub fix_maximum: Option<f64>,
}

impl ParamsOverride {
    /// Parse overrides from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse overrides from a TOML file.
    pub fn from_toml_file<P>(path: P) -> Result<Self, ConfigError>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let contents
            = std::fs::read_to_string(path)
            .map_err(|source| {
                ConfigError::Read { path: path.display().to_string(), source }
            })?;
        Self::from_toml_str(&contents)
    }

    /// Replace fields of `params` with those set in `self`.
    pub fn apply(&self, params: Params) -> Params {
        Params {
            nx: self.nx.unwrap_or(params.nx),
            ny: self.ny.unwrap_or(params.ny),
            xmax: self.xmax.unwrap_or(params.xmax),
            ymax: self.ymax.unwrap_or(params.ymax),
            dt: self.dt.unwrap_or(params.dt),
            tmax: self.tmax.unwrap_or(params.tmax),
            images: self.images.unwrap_or(params.images),
            absorb_coeff: self.absorb_coeff.unwrap_or(params.absorb_coeff),
            output_choice: self.output_choice.unwrap_or(params.output_choice),
            fix_maximum: self.fix_maximum.unwrap_or(params.fix_maximum),
        }
    }
}
