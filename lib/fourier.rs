//! Planned, in-place discrete Fourier transforms over one- and two-dimensional
//! arrays.
//!
//! Both transforms use the native (unshifted) frequency ordering of
//! [`rustfft`], i.e. the zero-frequency component sits at index 0 along every
//! axis, and the inverse transforms carry the `1/N` normalization so that a
//! forward-inverse pair is the identity.

use std::sync::Arc;
use ndarray as nd;
use num_complex::Complex64 as C64;
use rustfft::{ Fft, FftPlanner };

/// An in-place Fourier transform pair over arrays of a fixed shape.
pub trait Transform<D: nd::Dimension> {
    /// Apply the forward transform in place.
    fn forward(&mut self, q: &mut nd::Array<C64, D>);

    /// Apply the normalized inverse transform in place.
    fn inverse(&mut self, q: &mut nd::Array<C64, D>);
}

// forward and inverse plans for a single axis length
struct Plan {
    fwd: Arc<dyn Fft<f64>>,
    inv: Arc<dyn Fft<f64>>,
}

impl Plan {
    fn new(planner: &mut FftPlanner<f64>, n: usize) -> Self {
        Self { fwd: planner.plan_fft_forward(n), inv: planner.plan_fft_inverse(n) }
    }

    fn scratch_len(&self) -> usize {
        self.fwd.get_inplace_scratch_len()
            .max(self.inv.get_inplace_scratch_len())
    }
}

/// One-dimensional transform of length `n`.
pub struct Fft1 {
    n: usize,
    plan: Plan,
    scratch: Vec<C64>,
}

impl Fft1 {
    /// Plan transforms for arrays of length `n`.
    pub fn new(n: usize) -> Self {
        let mut planner = FftPlanner::new();
        let plan = Plan::new(&mut planner, n);
        let scratch = vec![C64::from(0.0); plan.scratch_len()];
        Self { n, plan, scratch }
    }

    /// Get the planned array length.
    pub fn len(&self) -> usize { self.n }

    /// Return `true` if the planned length is zero.
    pub fn is_empty(&self) -> bool { self.n == 0 }
}

// run a 1D plan over a lane that may not be contiguous, copying through `buf`
fn process_lane<S>(
    fft: &dyn Fft<f64>,
    mut lane: nd::ArrayBase<S, nd::Ix1>,
    buf: &mut [C64],
    scratch: &mut [C64],
)
where S: nd::DataMut<Elem = C64>
{
    if let Some(slice) = lane.as_slice_mut() {
        fft.process_with_scratch(slice, scratch);
    } else {
        buf.iter_mut().zip(lane.iter()).for_each(|(b, l)| { *b = *l; });
        fft.process_with_scratch(buf, scratch);
        lane.iter_mut().zip(buf.iter()).for_each(|(l, b)| { *l = *b; });
    }
}

impl Fft1 {
    fn apply(&mut self, q: &mut nd::Array1<C64>, inverse: bool) {
        let fft = if inverse { &*self.plan.inv } else { &*self.plan.fwd };
        let mut buf: Vec<C64>
            = if q.is_standard_layout() {
                Vec::new()
            } else {
                vec![C64::from(0.0); self.n]
            };
        process_lane(fft, q.view_mut(), &mut buf, &mut self.scratch);
    }
}

impl Transform<nd::Ix1> for Fft1 {
    fn forward(&mut self, q: &mut nd::Array1<C64>) {
        self.apply(q, false);
    }

    fn inverse(&mut self, q: &mut nd::Array1<C64>) {
        self.apply(q, true);
        let n = self.n as f64;
        q.map_inplace(|qk| { *qk /= n; });
    }
}

/// Two-dimensional transform over arrays of shape `(ny, nx)`, computed as
/// rows followed by columns.
pub struct Fft2 {
    shape: (usize, usize),
    rows: Plan,
    cols: Plan,
    column: Vec<C64>,
    scratch: Vec<C64>,
}

impl Fft2 {
    /// Plan transforms for arrays of shape `(ny, nx)`.
    pub fn new(ny: usize, nx: usize) -> Self {
        let mut planner = FftPlanner::new();
        let rows = Plan::new(&mut planner, nx);
        let cols = Plan::new(&mut planner, ny);
        let scratch
            = vec![C64::from(0.0); rows.scratch_len().max(cols.scratch_len())];
        let column = vec![C64::from(0.0); ny];
        Self { shape: (ny, nx), rows, cols, column, scratch }
    }

    /// Get the planned array shape.
    pub fn shape(&self) -> (usize, usize) { self.shape }

    fn apply(&mut self, q: &mut nd::Array2<C64>, inverse: bool) {
        let (row_fft, col_fft)
            = if inverse {
                (&*self.rows.inv, &*self.cols.inv)
            } else {
                (&*self.rows.fwd, &*self.cols.fwd)
            };
        let mut row_buf: Vec<C64>
            = if q.is_standard_layout() {
                Vec::new()
            } else {
                vec![C64::from(0.0); self.shape.1]
            };
        for row in q.rows_mut() {
            process_lane(row_fft, row, &mut row_buf, &mut self.scratch);
        }
        for col in q.columns_mut() {
            process_lane(col_fft, col, &mut self.column, &mut self.scratch);
        }
    }
}

impl Transform<nd::Ix2> for Fft2 {
    fn forward(&mut self, q: &mut nd::Array2<C64>) {
        self.apply(q, false);
    }

    fn inverse(&mut self, q: &mut nd::Array2<C64>) {
        self.apply(q, true);
        let n = (self.shape.0 * self.shape.1) as f64;
        q.map_inplace(|qk| { *qk /= n; });
    }
}
