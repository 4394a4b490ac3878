//! Provides a split-step Fourier (beam propagation) integrator for the
//! nonlinear Schrödinger equation in one or two spatial dimensions, with
//! absorbing boundaries, for both real-time evolution and imaginary-time
//! relaxation towards a ground state.
//!
//! A run is assembled from two pieces:
//! - a [grid provider][grid::GridProvider], which builds coordinates, the
//!   Laplacian in frequency space, the absorbing mask, and the Fourier
//!   transform for a given dimensionality;
//! - a [problem][problem::Problem], which supplies run parameters, an initial
//!   wavefunction, and a (possibly wavefunction-dependent) potential.
//!
//! These are handed to [`propagate::run`] together with an [output
//! sink][output::OutputSink]. A [registry][problems::lookup] of ready-made
//! problems is provided.
//!
//! ```
//! use fresnel::{
//!     config::ParamsOverride,
//!     grid::Dimensionality,
//!     output::Recorder,
//!     problems,
//!     propagate::{ Mode, RunControl },
//! };
//!
//! let prob = problems::lookup("harmonic", Dimensionality::One).unwrap();
//! let over = ParamsOverride {
//!     tmax: Some(0.5),
//!     images: Some(5),
//!     ..Default::default()
//! };
//! let mut rec = Recorder::new();
//! let summary
//!     = prob.run(&over, Mode::GroundState, &mut rec, &RunControl::new())
//!     .unwrap();
//! assert_eq!(summary.frames, 6);
//! assert!((summary.final_norm - rec.frames[0].norm).abs() < 1e-9);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod config;
pub mod utils;
pub mod fourier;
pub mod grid;
pub mod problem;
pub mod problems;
pub mod propagate;
pub mod output;

pub mod docs;

