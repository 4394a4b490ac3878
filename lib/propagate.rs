//! Split-step Fourier propagation of the (nonlinear) Schrödinger equation
//! ```text
//!   ∂ψ      1
//! i -- = - - ∇²ψ + V(x, t, ψ) ψ
//!   ∂t      2
//! ```
//! in real time, or relaxation towards a stationary state in imaginary time.
//!
//! Each step applies, in order:
//! 1. the potential phase `exp(-i dt V)` in real space;
//! 2. the linear (kinetic) factor `exp(σ L dt / 2)` in frequency space, with
//!    `σ = i` for real-time evolution and `σ = 1` for ground-state search;
//! 3. the absorbing mask in real space;
//! 4. rescaling to the initial norm.
//!
//! The potential term is never rotated; only the kinetic factor changes with
//! the [`Mode`].

use std::{
    sync::{ Arc, atomic::{ AtomicBool, Ordering } },
    time::{ Duration, Instant },
};
use ndarray::{ self as nd, Dimension };
use num_complex::Complex64 as C64;
use tracing::{ debug, info };
use crate::{
    config::Params,
    error::{ BpmError, BpmResult, ConfigError },
    fourier::Transform,
    grid::{ Dimensionality, GridProvider },
    output::{ Final, Frame, OutputSink },
    problem::Problem,
    utils::{ ifft_shift, wf_norm, wf_renormalize },
};

/// Propagation mode, fixed for the duration of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Real-time evolution.
    Evolution,
    /// Imaginary-time relaxation towards the lowest-lying stationary state.
    GroundState,
}

impl Mode {
    /// Select a mode from a "ground state" flag.
    pub fn from_ground(ground: bool) -> Self {
        if ground { Self::GroundState } else { Self::Evolution }
    }

    /// Multiplier of `L dt / 2` in the exponent of the linear phase factor.
    pub fn sigma(self) -> C64 {
        match self {
            Self::Evolution => C64::i(),
            Self::GroundState => C64::from(1.0),
        }
    }
}

/// Compute the linear phase factor `exp(σ L dt / 2)` for Laplacian eigenvalues
/// `laplacian` given in centered ordering, rearranged into the native
/// ordering of the [Fourier transforms][crate::fourier].
pub fn linear_phase<S, D>(laplacian: &nd::ArrayBase<S, D>, dt: f64, mode: Mode)
    -> nd::Array<C64, D>
where
    S: nd::Data<Elem = f64>,
    D: nd::Dimension,
{
    let sigma = mode.sigma();
    let centered = laplacian.mapv(|l| (sigma * l * dt / 2.0).exp());
    ifft_shift(&centered)
}

/// Owner of the wavefunction and all operators for a single run.
pub struct Propagator<'g, G: GridProvider> {
    grid: &'g G,
    params: Params,
    mode: Mode,
    phase: nd::Array<C64, G::Dim>,
    border: nd::Array<f64, G::Dim>,
    fft: G::Transform,
    psi: nd::Array<C64, G::Dim>,
    norm0: f64,
    step: usize,
}

impl<'g, G: GridProvider> Propagator<'g, G> {
    /// Set up propagation from the initial state `psi0`.
    ///
    /// Only the shape and norm of `psi0` are checked here; the remaining
    /// parameters are validated by [`run`].
    pub fn new(
        grid: &'g G,
        params: Params,
        mode: Mode,
        psi0: nd::Array<C64, G::Dim>,
    ) -> Result<Self, ConfigError>
    {
        ConfigError::check_shape(
            "initial condition", psi0.shape(), grid.shape().slice())?;
        let norm0 = wf_norm(&psi0);
        if !(norm0 > 0.0 && norm0.is_finite()) {
            return Err(ConfigError::ZeroNorm(norm0));
        }
        let phase = linear_phase(&grid.laplacian(), params.dt, mode);
        let border = grid.absorbing_mask(params.dt, params.absorb_coeff);
        let fft = grid.transform();
        Ok(Self {
            grid, params, mode, phase, border, fft, psi: psi0, norm0, step: 0,
        })
    }

    /// Get the number of steps taken so far.
    pub fn step_count(&self) -> usize { self.step }

    /// Get the current simulated time.
    pub fn time(&self) -> f64 { self.step as f64 * self.params.dt }

    /// Get the propagation mode.
    pub fn mode(&self) -> Mode { self.mode }

    /// Get the norm the wavefunction is held to.
    pub fn norm0(&self) -> f64 { self.norm0 }

    /// Get the current norm of the wavefunction.
    pub fn norm(&self) -> f64 { wf_norm(&self.psi) }

    /// Get a view of the current wavefunction.
    pub fn psi(&self) -> nd::ArrayView<'_, C64, G::Dim> { self.psi.view() }

    /// Get the precomputed linear phase factor, in native FFT ordering.
    pub fn phase(&self) -> nd::ArrayView<'_, C64, G::Dim> {
        self.phase.view()
    }

    /// Consume `self`, returning the current wavefunction.
    pub fn into_psi(self) -> nd::Array<C64, G::Dim> { self.psi }

    /// Advance by a single time step under the potential of `problem`.
    pub fn step<P>(&mut self, problem: &P) -> BpmResult<()>
    where P: Problem<G::Dim> + ?Sized
    {
        let dt = self.params.dt;
        let v = problem.potential(
            &self.params, self.grid.coords(), self.time(), self.psi.view());
        if v.shape() != self.psi.shape() {
            return Err(BpmError::Shape {
                step: self.step,
                got: v.shape().to_vec(),
                expected: self.psi.shape().to_vec(),
            });
        }
        nd::Zip::from(&mut self.psi).and(&v)
            .for_each(|q, &vk| { *q *= C64::cis(-dt * vk); });
        self.fft.forward(&mut self.psi);
        self.psi *= &self.phase;
        self.fft.inverse(&mut self.psi);
        nd::Zip::from(&mut self.psi).and(&self.border)
            .for_each(|q, &b| { *q *= b; });
        self.step += 1;
        BpmError::check_norm(self.step, wf_norm(&self.psi))?;
        wf_renormalize(&mut self.psi, self.norm0);
        Ok(())
    }
}

/// Cooperative cancellation flag for [`run_with_control`], checked between
/// steps.
#[derive(Clone, Debug, Default)]
pub struct RunControl {
    cancel: Arc<AtomicBool>,
}

impl RunControl {
    pub fn new() -> Self { Self::default() }

    /// Request that the run stop before its next step.
    pub fn cancel(&self) { self.cancel.store(true, Ordering::Relaxed); }

    /// Return `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool { self.cancel.load(Ordering::Relaxed) }
}

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Number of frames recorded, including the initial one.
    pub frames: usize,
    /// Number of steps taken.
    pub steps: usize,
    /// Final simulated time.
    pub time: f64,
    /// Norm of the final wavefunction.
    pub final_norm: f64,
    /// Wall-clock time spent propagating.
    pub elapsed: Duration,
    /// Per-frame summaries of `|ψ|²`, one column per frame.
    pub snapshots: nd::Array2<f64>,
}

/// Propagate `problem` on `grid` for `params.images` frames, reporting to
/// `sink`.
///
/// A frame is recorded every `params.steps_per_image()` steps, starting with
/// the initial condition at step 0, for `images + 1` frames in total. Exactly
/// `steps_per_image × images` steps are taken, so the wavefunction handed to
/// [`OutputSink::finalize`] is the one recorded in the last frame.
///
/// The initial condition and the potential at `t = 0` are both checked
/// against the grid shape before any frame is emitted.
pub fn run<G, P, O>(
    grid: &G,
    problem: &P,
    params: &Params,
    mode: Mode,
    sink: &mut O,
) -> BpmResult<RunSummary>
where
    G: GridProvider,
    P: Problem<G::Dim> + ?Sized,
    O: OutputSink<G::Dim> + ?Sized,
{
    run_with_control(grid, problem, params, mode, sink, &RunControl::new())
}

/// Like [`run`], but stopping early with [`BpmError::Cancelled`] if `control`
/// is cancelled.
pub fn run_with_control<G, P, O>(
    grid: &G,
    problem: &P,
    params: &Params,
    mode: Mode,
    sink: &mut O,
    control: &RunControl,
) -> BpmResult<RunSummary>
where
    G: GridProvider,
    P: Problem<G::Dim> + ?Sized,
    O: OutputSink<G::Dim> + ?Sized,
{
    let two_dim = grid.dimensionality() == Dimensionality::Two;
    params.validate(two_dim)?;
    let expected: Vec<usize>
        = if two_dim { vec![params.ny, params.nx] } else { vec![params.nx] };
    let shape = grid.shape();
    ConfigError::check_shape("grid", shape.slice(), &expected)?;
    let steps_per_image = params.steps_per_image()?;
    let total_steps = steps_per_image * params.images;
    let frame_dt = params.frame_dt()?;

    let psi0 = problem.initial_condition(params, grid.coords());
    let mut prop = Propagator::new(grid, *params, mode, psi0)?;
    let v0 = problem.potential(params, grid.coords(), 0.0, prop.psi());
    ConfigError::check_shape("potential", v0.shape(), shape.slice())?;
    let mut snapshots: nd::Array2<f64>
        = nd::Array2::zeros((grid.frame_len(), params.images + 1));
    info!(
        problem = problem.name(),
        dim = %grid.dimensionality(),
        ?mode,
        shape = ?shape.slice(),
        steps = total_steps,
        frames = params.images + 1,
        "starting propagation"
    );

    let start = Instant::now();
    for j in 0..=total_steps {
        if j % steps_per_image == 0 {
            let index = j / steps_per_image;
            let frame = Frame {
                index,
                step: j,
                time: prop.time(),
                coords: grid.coords(),
                psi: prop.psi(),
                params,
            };
            sink.emit_frame(&frame)?;
            snapshots.column_mut(index).assign(&grid.reduce_frame(prop.psi()));
            debug!(frame = index, t = prop.time(), norm = prop.norm(), "frame");
        }
        if j == total_steps { break; }
        if control.is_cancelled() { return Err(BpmError::Cancelled(j)); }
        prop.step(problem)?;
    }
    let elapsed = start.elapsed();

    let fin = Final {
        coords: grid.coords(),
        frame_dt,
        psi: prop.psi(),
        snapshots: snapshots.view(),
        params,
        mode,
        elapsed,
    };
    sink.finalize(&fin)?;
    let summary = RunSummary {
        frames: params.images + 1,
        steps: prop.step_count(),
        time: prop.time(),
        final_norm: prop.norm(),
        elapsed,
        snapshots,
    };
    info!(steps = summary.steps, elapsed = ?elapsed, "finished propagation");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;
    use super::*;
    use crate::{
        config::OutputChoice,
        grid::{ Coords, Grid1D, Grid2D },
        output::{ NullSink, Recorder },
        utils::{ fft_freq, wf_dot },
    };

    fn params(nx: usize, xmax: f64, dt: f64, tmax: f64, images: usize)
        -> Params
    {
        Params {
            nx,
            ny: nx,
            xmax,
            ymax: xmax,
            dt,
            tmax,
            images,
            absorb_coeff: 0.0,
            output_choice: OutputChoice::Display,
            fix_maximum: 0.0,
        }
    }

    struct Closures<F, V> {
        params: Params,
        init: F,
        pot: V,
    }

    fn problem<D, F, V>(params: Params, init: F, pot: V) -> Closures<F, V>
    where
        D: nd::Dimension,
        F: Fn(&Coords<D>) -> nd::Array<C64, D>,
        V: Fn(&Coords<D>, f64, nd::ArrayView<C64, D>) -> nd::Array<f64, D>,
    {
        Closures { params, init, pot }
    }

    impl<D, F, V> Problem<D> for Closures<F, V>
    where
        D: nd::Dimension,
        F: Fn(&Coords<D>) -> nd::Array<C64, D>,
        V: Fn(&Coords<D>, f64, nd::ArrayView<C64, D>) -> nd::Array<f64, D>,
    {
        fn name(&self) -> &str { "test" }

        fn params(&self) -> Params { self.params }

        fn initial_condition(&self, _params: &Params, coords: &Coords<D>)
            -> nd::Array<C64, D>
        {
            (self.init)(coords)
        }

        fn potential(
            &self,
            _params: &Params,
            coords: &Coords<D>,
            t: f64,
            psi: nd::ArrayView<C64, D>,
        ) -> nd::Array<f64, D>
        {
            (self.pot)(coords, t, psi)
        }
    }

    fn gaussian(x0: f64, w: f64, k: f64)
        -> impl Fn(&Coords<nd::Ix1>) -> nd::Array1<C64>
    {
        move |c| c.x.mapv(|x| C64::cis(k * x) * (-(x - x0).powi(2) / w).exp())
    }

    fn free<D: nd::Dimension>(
        c: &Coords<D>,
        _t: f64,
        _psi: nd::ArrayView<C64, D>,
    ) -> nd::Array<f64, D>
    {
        nd::Array::zeros(c.x.raw_dim())
    }

    fn harmonic(c: &Coords<nd::Ix1>, _t: f64, _psi: nd::ArrayView1<C64>)
        -> nd::Array1<f64>
    {
        c.x.mapv(|x| x.powi(2))
    }

    fn nonlinear(c: &Coords<nd::Ix1>, _t: f64, psi: nd::ArrayView1<C64>)
        -> nd::Array1<f64>
    {
        nd::Zip::from(&c.x).and(&psi)
            .map_collect(|x, q| 0.5 * x.powi(2) - 3.0 * q.norm_sqr())
    }

    fn blowup(c: &Coords<nd::Ix1>, _t: f64, _psi: nd::ArrayView1<C64>)
        -> nd::Array1<f64>
    {
        c.x.mapv(|_| f64::NAN)
    }

    fn short(_c: &Coords<nd::Ix1>, _t: f64, _psi: nd::ArrayView1<C64>)
        -> nd::Array1<f64>
    {
        nd::Array1::zeros(31)
    }

    fn short_later(c: &Coords<nd::Ix1>, t: f64, _psi: nd::ArrayView1<C64>)
        -> nd::Array1<f64>
    {
        if t > 0.0 { nd::Array1::zeros(31) } else { nd::Array1::zeros(c.x.len()) }
    }

    fn density(psi: nd::ArrayView1<C64>) -> nd::Array1<f64> {
        let d = psi.mapv(|q| q.norm_sqr());
        let s = d.sum();
        d / s
    }

    fn max_abs_diff(a: &nd::Array1<f64>, b: &nd::Array1<f64>) -> f64 {
        a.iter().zip(b).map(|(ak, bk)| (ak - bk).abs()).fold(0.0, f64::max)
    }

    #[test]
    fn linear_phase_matches_native_fft_ordering() {
        let dt = 0.05;
        for n in [15, 16] {
            let grid = Grid1D::new(n, 3.0).unwrap();
            let phase = linear_phase(&grid.laplacian(), dt, Mode::Evolution);
            let freq = fft_freq(n, grid.dx());
            assert_eq!(phase[0], C64::from(1.0));
            for (p, f) in phase.iter().zip(&freq) {
                let expected = C64::cis(-(TAU * f).powi(2) * dt / 2.0);
                assert!((p - expected).norm() < 1e-12);
            }
        }

        let (nx, ny, xmax, ymax) = (8, 5, 2.0, 3.0);
        let grid = Grid2D::new(nx, ny, xmax, ymax).unwrap();
        let phase = linear_phase(&grid.laplacian(), dt, Mode::GroundState);
        let fx = fft_freq(nx, 2.0 * xmax / nx as f64);
        let fy = fft_freq(ny, 2.0 * ymax / ny as f64);
        for ((i, j), p) in phase.indexed_iter() {
            let k2 = (TAU * fx[j]).powi(2) + (TAU * fy[i]).powi(2);
            assert!((p - C64::from((-k2 * dt / 2.0).exp())).norm() < 1e-12);
        }
    }

    #[test]
    fn zero_dt_step_is_identity() {
        let grid = Grid1D::new(64, 4.0).unwrap();
        for mode in [Mode::Evolution, Mode::GroundState] {
            let phase = linear_phase(&grid.laplacian(), 0.0, mode);
            assert!(phase.iter().all(|p| (p - C64::from(1.0)).norm() < 1e-15));

            let p = params(64, 4.0, 0.0, 1.0, 1);
            let prob = problem(p, gaussian(0.5, 1.0, 2.0), free::<nd::Ix1>);
            let psi0 = prob.initial_condition(&p, grid.coords());
            let mut prop = Propagator::new(&grid, p, mode, psi0.clone()).unwrap();
            prop.step(&prob).unwrap();
            let diff = (&prop.psi() - &psi0).mapv(|z| z.norm());
            assert!(diff.iter().all(|d| *d < 1e-12));
        }
    }

    #[test]
    fn modes_use_different_exponents() {
        let grid = Grid1D::new(32, 2.0).unwrap();
        let lap = grid.laplacian();
        let ev = linear_phase(&lap, 0.01, Mode::Evolution);
        let gs = linear_phase(&lap, 0.01, Mode::GroundState);
        let lap = ifft_shift(&lap);
        for ((e, g), l) in ev.iter().zip(&gs).zip(&lap) {
            assert!((e.norm() - 1.0).abs() < 1e-12);
            assert!(g.im == 0.0 && g.re > 0.0 && g.re <= 1.0);
            if *l != 0.0 {
                assert!((e - g).norm() > 1e-9);
            } else {
                assert_eq!(e, g);
            }
        }
        assert_eq!(Mode::from_ground(true), Mode::GroundState);
        assert_eq!(Mode::from_ground(false).sigma(), C64::i());
    }

    #[test]
    fn norm_is_pinned_every_step() {
        // nonlinear potential and absorbing boundary both change the norm
        // before renormalization
        for absorb_coeff in [0.0, 20.0] {
            let grid = Grid1D::new(128, 5.0).unwrap();
            let mut p = params(128, 5.0, 0.005, 1.0, 1);
            p.absorb_coeff = absorb_coeff;
            let prob = problem(p, gaussian(3.0, 0.5, 4.0), nonlinear);
            let psi0 = prob.initial_condition(&p, grid.coords());
            let mut prop
                = Propagator::new(&grid, p, Mode::Evolution, psi0).unwrap();
            let norm0 = prop.norm0();
            for _ in 0..50 {
                prop.step(&prob).unwrap();
                assert!((prop.norm() - norm0).abs() < 1e-10 * norm0);
            }
        }

        let grid = Grid2D::new(32, 16, 4.0, 3.0).unwrap();
        let mut p = params(32, 4.0, 0.01, 1.0, 1);
        p.ny = 16;
        p.ymax = 3.0;
        p.absorb_coeff = 10.0;
        let init = |c: &Coords<nd::Ix2>| {
            nd::Zip::from(&c.x).and(&c.y)
                .map_collect(|x, y| C64::from((-(x - 2.0).powi(2) - y.powi(2)).exp()))
        };
        let prob = problem(p, init, free::<nd::Ix2>);
        let psi0 = prob.initial_condition(&p, grid.coords());
        let mut prop = Propagator::new(&grid, p, Mode::Evolution, psi0).unwrap();
        let norm0 = prop.norm0();
        for _ in 0..20 {
            prop.step(&prob).unwrap();
            assert!((prop.norm() - norm0).abs() < 1e-10 * norm0);
        }
    }

    #[test]
    fn free_gaussian_spreads_like_closed_form() {
        // ψ(x, t) = (1 + i t)^(-1/2) exp(-x² / 2(1 + i t)) for ψ(x, 0) = exp(-x² / 2)
        let grid = Grid1D::new(256, 20.0).unwrap();
        let p = params(256, 20.0, 0.01, 1.0, 1);
        let prob = problem(p, gaussian(0.0, 2.0, 0.0), free::<nd::Ix1>);
        let psi0 = prob.initial_condition(&p, grid.coords());
        let mut prop = Propagator::new(&grid, p, Mode::Evolution, psi0).unwrap();
        for _ in 0..100 { prop.step(&prob).unwrap(); }
        let t = prop.time();
        assert!((t - 1.0).abs() < 1e-12);
        let a = C64::new(1.0, t);
        let expected: nd::Array1<C64>
            = grid.coords().x.mapv(|x| (-x.powi(2) / (2.0 * a)).exp() / a.sqrt());
        let err
            = prop.psi().iter().zip(&expected)
            .map(|(q, e)| (q - e).norm())
            .fold(0.0, f64::max);
        assert!(err < 1e-9);
    }

    #[test]
    fn stronger_absorption_leaves_less_at_the_boundary() {
        let boundary_density = |absorb_coeff: f64| {
            let grid = Grid1D::new(128, 5.0).unwrap();
            let mut p = params(128, 5.0, 0.005, 1.0, 1);
            p.absorb_coeff = absorb_coeff;
            let prob = problem(p, gaussian(3.5, 0.5, 4.0), free::<nd::Ix1>);
            let psi0 = prob.initial_condition(&p, grid.coords());
            let mut prop
                = Propagator::new(&grid, p, Mode::Evolution, psi0).unwrap();
            for _ in 0..60 { prop.step(&prob).unwrap(); }
            prop.psi().iter().zip(&grid.coords().x)
                .filter(|(_, x)| x.abs() > 4.0)
                .map(|(q, _)| q.norm_sqr())
                .sum::<f64>()
        };
        let d0 = boundary_density(0.0);
        let d5 = boundary_density(5.0);
        let d20 = boundary_density(20.0);
        assert!(d0 > d5);
        assert!(d5 > d20);
    }

    #[test]
    fn snapshot_cadence() {
        let grid = Grid1D::new(64, 4.0).unwrap();
        let p = params(64, 4.0, 0.01, 0.4, 4);
        assert_eq!(p.steps_per_image().unwrap(), 10);
        let prob = problem(p, gaussian(0.0, 1.0, 1.0), free::<nd::Ix1>);
        let mut rec = Recorder::new();
        let summary = run(&grid, &prob, &p, Mode::Evolution, &mut rec).unwrap();
        assert_eq!(rec.steps(), vec![0, 10, 20, 30, 40]);
        assert_eq!(
            rec.frames.iter().map(|fr| fr.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4],
        );
        assert!(rec.frames.iter().all(|fr| (fr.time - fr.step as f64 * 0.01).abs() < 1e-12));
        assert!(rec.finalized);
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.steps, 40);
        assert_eq!(summary.snapshots.dim(), (64, 5));

        let psi0 = prob.initial_condition(&p, grid.coords());
        let first = summary.snapshots.column(0).to_owned();
        assert!(max_abs_diff(&first, &psi0.mapv(|q| q.norm_sqr())) < 1e-15);
        let norm0 = rec.frames[0].norm;
        assert!(rec.frames.iter().all(|fr| (fr.norm - norm0).abs() < 1e-10));
    }

    #[test]
    fn ground_state_converges_from_different_guesses() {
        // the kinetic factor is rotated but the potential phase is not, so for
        // V = x² the scheme relaxes to exp(-(1 + i) x² / 2), i.e. |ψ|² ∝ exp(-x²)
        let grid = Grid1D::new(128, 8.0).unwrap();
        let p = params(128, 8.0, 0.01, 1.0, 1);
        let expected = {
            let d = grid.coords().x.mapv(|x| (-x.powi(2)).exp());
            let s = d.sum();
            d / s
        };
        let relax = |init: Box<dyn Fn(&Coords<nd::Ix1>) -> nd::Array1<C64>>| {
            let prob = problem(p, init, harmonic);
            let psi0 = prob.initial_condition(&p, grid.coords());
            let mut prop
                = Propagator::new(&grid, p, Mode::GroundState, psi0).unwrap();
            let mut prev = density(prop.psi());
            let mut residuals: Vec<f64> = Vec::new();
            for _ in 0..6 {
                for _ in 0..200 { prop.step(&prob).unwrap(); }
                let cur = density(prop.psi());
                residuals.push(max_abs_diff(&cur, &prev));
                prev = cur;
            }
            (prop.into_psi(), residuals)
        };
        let (psi_a, res_a) = relax(Box::new(gaussian(1.0, 2.0, 0.0)));
        let (psi_b, res_b)
            = relax(Box::new(|c: &Coords<nd::Ix1>| {
                c.x.mapv(|x| C64::from((-(x + 0.5).powi(2) / 4.0).exp() * (1.0 + 0.3 * x)))
            }));
        for res in [&res_a, &res_b] {
            assert!(res[res.len() - 1] < res[0] / 10.0);
            assert!(res[res.len() - 1] < 1e-4);
        }
        let da = density(psi_a.view());
        let db = density(psi_b.view());
        assert!(max_abs_diff(&da, &db) < 1e-5);
        assert!(max_abs_diff(&da, &expected) < 1e-5);
        // same state up to a global phase
        let overlap = wf_dot(&psi_a, &psi_b).norm()
            / (wf_norm(&psi_a) * wf_norm(&psi_b));
        assert!((overlap - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_norm_is_fatal() {
        let grid = Grid1D::new(32, 2.0).unwrap();
        let p = params(32, 2.0, 0.01, 0.1, 1);
        let prob = problem(p, gaussian(0.0, 1.0, 0.0), blowup);
        let res = run(&grid, &prob, &p, Mode::Evolution, &mut NullSink);
        assert!(matches!(res, Err(BpmError::Degenerate { step: 1, .. })));

        let zero = |c: &Coords<nd::Ix1>| c.x.mapv(|_| C64::from(0.0));
        let prob = problem(p, zero, free::<nd::Ix1>);
        let res = run(&grid, &prob, &p, Mode::Evolution, &mut NullSink);
        assert!(matches!(res, Err(BpmError::Config(ConfigError::ZeroNorm(_)))));
    }

    #[test]
    fn shape_mismatches_are_reported() {
        let grid = Grid1D::new(32, 2.0).unwrap();
        let p = params(32, 2.0, 0.01, 0.1, 1);

        let long = |_: &Coords<nd::Ix1>| nd::Array1::from_elem(33, C64::from(1.0));
        let prob = problem(p, long, free::<nd::Ix1>);
        let res = run(&grid, &prob, &p, Mode::Evolution, &mut NullSink);
        assert!(matches!(
            res,
            Err(BpmError::Config(ConfigError::Shape { what: "initial condition", .. }))
        ));

        // caught before the first frame reaches the sink
        let prob = problem(p, gaussian(0.0, 1.0, 0.0), short);
        let mut rec = Recorder::new();
        let res = run(&grid, &prob, &p, Mode::Evolution, &mut rec);
        assert!(matches!(
            res,
            Err(BpmError::Config(ConfigError::Shape { what: "potential", .. }))
        ));
        assert!(rec.frames.is_empty());

        // a potential that only goes wrong later is caught by the step itself
        let prob = problem(p, gaussian(0.0, 1.0, 0.0), short_later);
        let mut rec = Recorder::new();
        let res = run(&grid, &prob, &p, Mode::Evolution, &mut rec);
        assert!(matches!(res, Err(BpmError::Shape { step: 1, .. })));
        assert_eq!(rec.frames.len(), 1);
        assert!(!rec.finalized);

        let mut q = p;
        q.nx = 16;
        let prob = problem(q, gaussian(0.0, 1.0, 0.0), free::<nd::Ix1>);
        let res = run(&grid, &prob, &q, Mode::Evolution, &mut NullSink);
        assert!(matches!(
            res,
            Err(BpmError::Config(ConfigError::Shape { what: "grid", .. }))
        ));
    }

    #[test]
    fn bad_params_fail_before_any_output() {
        let grid = Grid1D::new(32, 2.0).unwrap();
        let mut p = params(32, 2.0, 0.01, 0.1, 1);
        p.dt = -0.01;
        let prob = problem(p, gaussian(0.0, 1.0, 0.0), free::<nd::Ix1>);
        let mut rec = Recorder::new();
        let res = run(&grid, &prob, &p, Mode::Evolution, &mut rec);
        assert!(matches!(
            res,
            Err(BpmError::Config(ConfigError::NonPositive("dt", _)))
        ));
        assert!(rec.frames.is_empty());
    }

    #[test]
    fn cancelled_run_stops_between_steps() {
        let grid = Grid1D::new(32, 2.0).unwrap();
        let p = params(32, 2.0, 0.01, 0.1, 1);
        let prob = problem(p, gaussian(0.0, 1.0, 0.0), free::<nd::Ix1>);
        let control = RunControl::new();
        control.cancel();
        let mut rec = Recorder::new();
        let res = run_with_control(
            &grid, &prob, &p, Mode::Evolution, &mut rec, &control);
        assert!(matches!(res, Err(BpmError::Cancelled(0))));
        assert_eq!(rec.frames.len(), 1);
        assert!(!rec.finalized);
    }
}
