//! Consumers of per-frame and end-of-run data.
//!
//! Sinks are invoked by [`run`][crate::propagate::run] and never touch the
//! numerics; any error they return aborts the run.

use std::{ fs, path::{ Path, PathBuf }, time::Duration };
use ndarray as nd;
use ndarray_npy::write_npy;
use num_complex::Complex64 as C64;
use tracing::info;
use crate::{
    config::Params,
    error::OutputError,
    grid::Coords,
    propagate::Mode,
    utils::wf_norm,
};

pub type OutputResult<T> = Result<T, OutputError>;

/// State of a run at a single recorded frame.
#[derive(Clone, Debug)]
pub struct Frame<'a, D: nd::Dimension> {
    /// Frame index, starting from 0 for the initial condition.
    pub index: usize,
    /// Number of time steps taken so far.
    pub step: usize,
    /// Simulated time.
    pub time: f64,
    pub coords: &'a Coords<D>,
    pub psi: nd::ArrayView<'a, C64, D>,
    pub params: &'a Params,
}

/// State of a run after its last step.
#[derive(Clone, Debug)]
pub struct Final<'a, D: nd::Dimension> {
    pub coords: &'a Coords<D>,
    /// Simulated time between consecutive frames.
    pub frame_dt: f64,
    /// Final wavefunction.
    pub psi: nd::ArrayView<'a, C64, D>,
    /// Per-frame summaries of `|ψ|²`, one column per frame.
    pub snapshots: nd::ArrayView2<'a, f64>,
    pub params: &'a Params,
    pub mode: Mode,
    /// Wall-clock time spent propagating.
    pub elapsed: Duration,
}

/// Receiver of run output.
pub trait OutputSink<D: nd::Dimension> {
    /// Handle a single frame.
    fn emit_frame(&mut self, frame: &Frame<'_, D>) -> OutputResult<()>;

    /// Handle the end of a run. Called exactly once, after the last frame.
    fn finalize(&mut self, fin: &Final<'_, D>) -> OutputResult<()>;
}

/// Sink that discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl<D: nd::Dimension> OutputSink<D> for NullSink {
    fn emit_frame(&mut self, _frame: &Frame<'_, D>) -> OutputResult<()> {
        Ok(())
    }

    fn finalize(&mut self, _fin: &Final<'_, D>) -> OutputResult<()> {
        Ok(())
    }
}

/// Record of a single frame kept by [`Recorder`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameRecord {
    pub index: usize,
    pub step: usize,
    pub time: f64,
    pub norm: f64,
}

/// Sink that keeps lightweight per-frame records in memory.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub frames: Vec<FrameRecord>,
    pub finalized: bool,
    pub final_norm: Option<f64>,
}

impl Recorder {
    pub fn new() -> Self { Self::default() }

    /// Step indices at which frames were recorded.
    pub fn steps(&self) -> Vec<usize> {
        self.frames.iter().map(|fr| fr.step).collect()
    }
}

impl<D: nd::Dimension> OutputSink<D> for Recorder {
    fn emit_frame(&mut self, frame: &Frame<'_, D>) -> OutputResult<()> {
        self.frames.push(FrameRecord {
            index: frame.index,
            step: frame.step,
            time: frame.time,
            norm: wf_norm(&frame.psi),
        });
        Ok(())
    }

    fn finalize(&mut self, fin: &Final<'_, D>) -> OutputResult<()> {
        self.finalized = true;
        self.final_norm = Some(wf_norm(&fin.psi));
        Ok(())
    }
}

/// Sink writing `.npy` files to a directory.
///
/// Per frame, `|ψ|²` is written to `frame_NNNN.npy` if the run's
/// [output choice][crate::config::OutputChoice] includes saving, and a log
/// line is emitted if it includes display. On finalization, the following
/// are always written:
/// - `x.npy`: x coordinates
/// - `evolution.npy`: the snapshot buffer (grid axis × frame)
/// - `psi_final.npy`: the final (complex) wavefunction
/// - `params.toml`: the parameters of the run
#[derive(Clone, Debug)]
pub struct NpyDir {
    outdir: PathBuf,
}

impl NpyDir {
    /// Create the output directory if needed and remove any frame files left
    /// over from a previous run.
    pub fn new<P>(outdir: P) -> OutputResult<Self>
    where P: AsRef<Path>
    {
        let outdir = outdir.as_ref().to_path_buf();
        fs::create_dir_all(&outdir)?;
        for entry in fs::read_dir(&outdir)? {
            let path = entry?.path();
            let is_frame
                = path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.starts_with("frame_") && name.ends_with(".npy")
                });
            if is_frame { fs::remove_file(&path)?; }
        }
        Ok(Self { outdir })
    }

    /// Get the output directory.
    pub fn outdir(&self) -> &Path { &self.outdir }
}

impl<D: nd::Dimension> OutputSink<D> for NpyDir {
    fn emit_frame(&mut self, frame: &Frame<'_, D>) -> OutputResult<()> {
        let choice = frame.params.output_choice;
        let density = frame.psi.mapv(|q| q.norm_sqr());
        if choice.displays() {
            let peak = density.iter().copied().fold(0.0_f64, f64::max);
            let scale
                = if frame.params.fix_maximum > 0.0 {
                    frame.params.fix_maximum
                } else {
                    peak
                };
            info!(
                frame = frame.index,
                t = frame.time,
                peak,
                relative_peak = peak / scale,
                "frame"
            );
        }
        if choice.saves() {
            let path = self.outdir.join(format!("frame_{:04}.npy", frame.index));
            write_npy(path, &density)?;
        }
        Ok(())
    }

    fn finalize(&mut self, fin: &Final<'_, D>) -> OutputResult<()> {
        write_npy(self.outdir.join("x.npy"), &fin.coords.x)?;
        write_npy(self.outdir.join("evolution.npy"), &fin.snapshots)?;
        write_npy(self.outdir.join("psi_final.npy"), &fin.psi)?;
        fs::write(self.outdir.join("params.toml"), toml::to_string(fin.params)?)?;
        info!(
            outdir = %self.outdir.display(),
            elapsed = ?fin.elapsed,
            "wrote final output"
        );
        Ok(())
    }
}
